//! Core data types shared by every stage of a transform run.
//!
//! ## Module Structure
//!
//! - `change`: Change and MatchContext (one anchored source edit)
//! - `comment_style`: CommentStyle enum (line vs block extraction comments)
//! - `key`: TranslationKey and the caller-owned KnownTranslations map
//! - `records`: ExtractedString, UsedExistingKey and SourcePosition

pub mod change;
pub mod comment_style;
pub mod key;
pub mod records;

pub use change::{Change, MatchContext};
pub use comment_style::CommentStyle;
pub use key::{KnownTranslations, TranslationKey};
pub use records::{ExtractedString, SourcePosition, UsedExistingKey};
