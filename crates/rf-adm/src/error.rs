//! Error types for the ADM object model

use thiserror::Error;

use crate::ElementKind;

/// ADM error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdmError {
    /// Numeric value outside of the permitted range
    #[error("{name} out of range: {value} (permitted: {range})")]
    OutOfRange {
        name: &'static str,
        value: String,
        range: String,
    },

    /// Value not in the permitted set of literal values
    #[error("invalid {name}: {value} (permitted: {allowed})")]
    InvalidValue {
        name: &'static str,
        value: String,
        allowed: String,
    },

    /// String not in the permitted set of choices
    #[error("invalid {name}: \"{value}\" (permitted: {allowed})")]
    InvalidString {
        name: &'static str,
        value: String,
        allowed: String,
    },

    /// ID, timecode or label string could not be parsed
    #[error("invalid {what} \"{input}\": {reason} (expected format {expected})")]
    Parse {
        what: &'static str,
        input: String,
        expected: String,
        reason: String,
    },

    /// Adding the reference would close a loop
    #[error("reference cycle: adding {to} to {from} would create a cycle")]
    ReferenceCycle { from: String, to: String },

    /// The other reference of an exclusive pair is already set
    #[error("mutually exclusive references on {element}: {existing} is set, cannot also reference {requested}")]
    MutuallyExclusiveReferences {
        element: String,
        existing: String,
        requested: String,
    },

    /// ID is already used by another element of the same kind
    #[error("{kind} ID {id} already in use")]
    DuplicateId { kind: ElementKind, id: String },

    /// Element belongs to another document
    #[error("{kind} belongs to a different document")]
    CrossDocumentReference { kind: ElementKind },

    /// Handle does not resolve to an element (removed or never added)
    #[error("{kind} not found in document")]
    ElementNotFound { kind: ElementKind },

    /// Silent AudioTrackUid (id 0) constraint violated
    #[error("silent AudioTrackUid: {0}")]
    SilentTrackUid(String),

    /// Channel reachable through routes with different lengths
    #[error("AudioChannelFormat {channel} cannot have different effective durations ({first} vs {second})")]
    InconsistentDuration {
        channel: String,
        first: String,
        second: String,
    },

    /// Type definition not handled by the operation
    #[error("unhandled type definition {0}")]
    UnhandledTypeDefinition(String),

    /// Type descriptor of an ID or block does not match its element
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// Programme has no End and no explicit length was supplied
    #[error("AudioProgramme {0} has no End")]
    MissingProgrammeEnd(String),

    /// Optional parameter read while unset
    #[error("{0} is not set")]
    InvalidAccess(&'static str),

    /// Generic invariant violation
    #[error("invariant violation: {0}")]
    Invariant(String),
}

/// Result type alias
pub type AdmResult<T> = Result<T, AdmError>;

impl AdmError {
    pub(crate) fn parse(
        what: &'static str,
        input: &str,
        expected: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            what,
            input: input.to_string(),
            expected: expected.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AdmError::DuplicateId {
            kind: ElementKind::AudioObject,
            id: "AO_1001".into(),
        };
        assert_eq!(err.to_string(), "AudioObject ID AO_1001 already in use");

        let err = AdmError::parse("AudioProgrammeId", "APR_1", "APR_xxxx", "wrong length");
        assert!(err.to_string().contains("APR_xxxx"));
        assert!(err.to_string().contains("APR_1"));
    }
}
