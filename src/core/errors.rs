//! Shared error types for the risk and compliance engine

use super::types::ImplementationStatus;
use thiserror::Error;

/// Kind of record an id refers to, used in lookup and collision errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hazard,
    ControlMeasure,
    ChecklistItem,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hazard => write!(f, "Hazard"),
            Self::ControlMeasure => write!(f, "Control measure"),
            Self::ChecklistItem => write!(f, "Checklist item"),
        }
    }
}

/// Structured error code for programmatic handling.
///
/// - E001-E009: lookup and identity errors
/// - E010-E019: closed-set and range validation errors
/// - E020-E029: configuration and input errors
/// - E030-E039: enrichment errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Lookup by id failed
    pub const NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// Insert collided with an existing id
    pub const DUPLICATE_ID: ErrorCode = ErrorCode("E002");
    /// Hazard category outside the closed set
    pub const INVALID_CATEGORY: ErrorCode = ErrorCode("E010");
    /// Compliance status outside the closed set
    pub const INVALID_STATUS: ErrorCode = ErrorCode("E011");
    /// Value outside its declared range
    pub const INVALID_VALUE: ErrorCode = ErrorCode("E012");
    /// Implementation status moved backwards
    pub const STATUS_REGRESSION: ErrorCode = ErrorCode("E013");
    /// Configuration file problem
    pub const CONFIG: ErrorCode = ErrorCode("E020");
    /// Input file could not be read or parsed
    pub const INPUT: ErrorCode = ErrorCode("E021");
    /// Hazard suggestion capability failed
    pub const ENRICHMENT: ErrorCode = ErrorCode("E030");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for qmsrisk operations
#[derive(Debug, Error)]
pub enum Error {
    /// Lookup by id failed
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// Insertion with an id that is already registered
    #[error("{kind} '{id}' already exists")]
    DuplicateId { kind: EntityKind, id: String },

    /// Hazard category not in the ISO 14971 category set
    #[error("Invalid hazard category: {0}")]
    InvalidCategory(String),

    /// Compliance status not in the closed status set
    #[error("Invalid compliance status: {0}")]
    InvalidStatus(String),

    /// Value outside its scale or enumeration
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Implementation status moved backwards
    #[error("Control measure '{id}' cannot move from {from} back to {to}")]
    StatusRegression {
        id: String,
        from: ImplementationStatus,
        to: ImplementationStatus,
    },

    /// Hazard suggestion failed; converted to the template fallback before
    /// it reaches callers of the enrichment hook
    #[error("Hazard enrichment unavailable: {0}")]
    Enrichment(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn duplicate(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_value(field: &'static str, value: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NOT_FOUND,
            Self::DuplicateId { .. } => ErrorCode::DUPLICATE_ID,
            Self::InvalidCategory(_) => ErrorCode::INVALID_CATEGORY,
            Self::InvalidStatus(_) => ErrorCode::INVALID_STATUS,
            Self::InvalidValue { .. } => ErrorCode::INVALID_VALUE,
            Self::StatusRegression { .. } => ErrorCode::STATUS_REGRESSION,
            Self::Enrichment(_) => ErrorCode::ENRICHMENT,
            Self::Configuration(_) => ErrorCode::CONFIG,
            Self::WithContext { .. } | Self::Io(_) | Self::Json(_) | Self::Toml(_) => {
                ErrorCode::INPUT
            }
        }
    }

    /// Check if this error is something the user can fix by correcting input
    #[must_use]
    pub fn is_user_fixable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Enrichment(_))
    }

    /// Get the suggested process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 3,
            Self::InvalidCategory(_)
            | Self::InvalidStatus(_)
            | Self::InvalidValue { .. }
            | Self::StatusRegression { .. } => 4,
            Self::NotFound { .. } | Self::DuplicateId { .. } => 5,
            _ => 1,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_kind_and_id() {
        let err = Error::not_found(EntityKind::Hazard, "H-404");
        assert_eq!(err.to_string(), "Hazard 'H-404' not found");
        assert_eq!(err.code(), ErrorCode::NOT_FOUND);
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::InvalidCategory("Acoustic".into()));
        let err = result.context("loading risk file").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loading risk file: Invalid hazard category: Acoustic"
        );
    }

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::Configuration("bad".into()).exit_code(), 3);
        assert_eq!(Error::InvalidStatus("done".into()).exit_code(), 4);
        assert_eq!(Error::duplicate(EntityKind::ControlMeasure, "C1").exit_code(), 5);
        assert!(!Error::Enrichment("timeout".into()).is_user_fixable());
    }
}
