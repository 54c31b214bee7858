//! Transform core.
//!
//! Pure text in, text out: nothing here touches the filesystem. The entry point
//! is [`transform_source`].
//!
//! ## Module Structure
//!
//! - `data`: changes, keys and bookkeeping records
//! - `error`: typed failures and configuration warnings
//! - `pattern`: delimiter pattern matching
//! - `key_manager`: canonical values and key resolution
//! - `context_detector`: function roles and accessor conventions
//! - `collector`: the replacement-collecting walk
//! - `patch`: back-to-front text splicing
//! - `insert`: import and acquisition insertion
//! - `template`: pluggable single-file component template front end
//! - `pipeline`: per-file orchestration
//! - `parsers`: swc script parsing and component block splitting

pub mod collector;
pub mod context_detector;
pub mod data;
pub mod error;
pub mod insert;
pub mod key_manager;
pub mod options;
pub mod parsers;
pub mod patch;
pub mod pattern;
pub mod pipeline;
pub mod template;

pub use data::{
    Change, CommentStyle, ExtractedString, KnownTranslations, MatchContext, SourcePosition,
    TranslationKey, UsedExistingKey,
};
pub use error::{ConfigWarning, TransformError};
pub use key_manager::{
    KeyConflictDecision, KeyGenerator, KeyManager, KeyResolver, ResolverContext, canonicalize,
};
pub use options::{AccessorConfig, CallBuilder, TransformOptions};
pub use pattern::{DEFAULT_PATTERN, DelimiterPattern, PatternMatch};
pub use pipeline::{TransformOutput, transform_source};
pub use template::{TemplateFrontEnd, TemplateSite, TemplateSiteKind};
