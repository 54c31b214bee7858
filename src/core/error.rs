//! Typed failures raised by the transform core.
//!
//! Every variant carries a stable code (see [`TransformError::code`]) so callers can
//! classify failures without matching on message text.

use serde::Serialize;

/// A failure that prevented a file from being transformed.
///
/// Parse and position failures are recovered by returning the original text
/// unchanged; the error is still handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum TransformError {
    /// The source text could not be parsed.
    #[serde(rename = "parse-error")]
    #[error("Failed to parse {file_path}: {message}")]
    Parse { file_path: String, message: String },

    /// The file extension does not map to a supported dialect.
    #[error("Unsupported file type: {file_path}")]
    UnsupportedFileType { file_path: String },

    /// A change could not be anchored in the text it was meant to edit.
    #[error("Cannot resolve replacement position at {file_path}:{line}:{column} for {original:?}")]
    UnresolvablePosition {
        file_path: String,
        line: usize,
        column: usize,
        original: String,
    },

    /// Two changes claim overlapping byte ranges.
    #[error("Overlapping changes in {file_path} at bytes {first_start}..{first_end} and {second_start}..{second_end}")]
    OverlappingChanges {
        file_path: String,
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// The options handed to the core are unusable.
    #[serde(rename = "invalid-config")]
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl TransformError {
    /// Stable, kebab-case identifier of the failure class.
    pub fn code(&self) -> &'static str {
        match self {
            TransformError::Parse { .. } => "parse-error",
            TransformError::UnsupportedFileType { .. } => "unsupported-file-type",
            TransformError::UnresolvablePosition { .. } => "unresolvable-position",
            TransformError::OverlappingChanges { .. } => "overlapping-changes",
            TransformError::InvalidConfig { .. } => "invalid-config",
        }
    }
}

/// A non-fatal configuration problem with a documented default resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum ConfigWarning {
    /// A deprecated option was used because its replacement was absent.
    #[error("Option '{deprecated}' is deprecated, use '{replacement}' instead")]
    DeprecatedOption {
        deprecated: String,
        replacement: String,
    },

    /// Both the deprecated and the current form were given with different values.
    #[error("Option '{deprecated}' ({ignored:?}) conflicts with '{replacement}' ({used:?}); using '{replacement}'")]
    ConflictingOption {
        deprecated: String,
        replacement: String,
        ignored: String,
        used: String,
    },
}

impl ConfigWarning {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigWarning::DeprecatedOption { .. } => "deprecated-option",
            ConfigWarning::ConflictingOption { .. } => "conflicting-option",
        }
    }
}
