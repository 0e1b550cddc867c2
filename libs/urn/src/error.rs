//! Error types for URN construction, parsing and type checks.

use thiserror::Error;

/// Errors that can occur when building, parsing or checking URNs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrnError {
    /// The namespace or collection is missing or fails the segment grammar.
    #[error("invalid URN segment [{segment}]: {reason}")]
    InvalidSegment {
        segment: String,
        reason: &'static str,
    },

    /// The identifier is empty, contains ':' or does not decode.
    #[error("invalid URN identifier [{identifier}]: {reason}")]
    InvalidIdentifier {
        identifier: String,
        reason: &'static str,
    },

    /// The text is not three grammar-valid ':'-separated segments.
    #[error(
        "invalid URN format: [{input}] is not namespace:collection:identifier \
         with each segment matching {grammar}",
        grammar = crate::SEGMENT_GRAMMAR
    )]
    MalformedUrn { input: String },

    /// The identifier portion is not a UUID.
    #[error("URN identifier in [{urn}] is not a valid UUID")]
    NotAUuid { urn: String },

    /// A value did not have the kind or shape the caller required.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// The URN addresses none of the entity kinds an operation accepts.
    #[error("URN [{urn}] is not supported. Supported URNs are: [{supported}]")]
    UnsupportedType { urn: String, supported: String },
}

impl UrnError {
    /// Returns true if this error came from rejecting malformed input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            UrnError::InvalidSegment { .. }
                | UrnError::InvalidIdentifier { .. }
                | UrnError::MalformedUrn { .. }
        )
    }

    /// Returns true if this error indicates a kind or shape mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            UrnError::TypeMismatch { .. } | UrnError::UnsupportedType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = UrnError::InvalidSegment {
            segment: "a b".to_string(),
            reason: "segment must match [A-Za-z0-9._%-]+",
        };
        assert_eq!(
            err.to_string(),
            "invalid URN segment [a b]: segment must match [A-Za-z0-9._%-]+"
        );

        let err = UrnError::MalformedUrn {
            input: "a:b".to_string(),
        };
        assert!(err.to_string().contains("[a:b]"));
        assert!(err.to_string().contains("[A-Za-z0-9._%-]+"));
    }

    #[test]
    fn test_classification() {
        let parse = UrnError::MalformedUrn {
            input: String::new(),
        };
        assert!(parse.is_parse_error());
        assert!(!parse.is_type_mismatch());

        let mismatch = UrnError::TypeMismatch {
            expected: "a".to_string(),
            actual: "b".to_string(),
        };
        assert!(mismatch.is_type_mismatch());
        assert!(!mismatch.is_parse_error());

        let not_uuid = UrnError::NotAUuid {
            urn: "a:b:c".to_string(),
        };
        assert!(!not_uuid.is_parse_error());
        assert!(!not_uuid.is_type_mismatch());
    }
}
