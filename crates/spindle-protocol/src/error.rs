//! Error types for protocol encode/decode.
//!
//! All errors are recoverable decode-time failures: an invalid input never
//! yields a default or partially-built expression. Callers decide whether to
//! abort the surrounding request or retry with corrected input.

use thiserror::Error;

/// Result type alias for protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the expression codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The JSON object has no `@type` field, so no variant can be resolved.
    #[error("expression object is missing the \"@type\" discriminator")]
    MissingDiscriminator,

    /// The `@type` value is not a registered expression tag.
    #[error("unknown expression tag {0:?}")]
    UnknownVariantTag(String),

    /// A declared field is absent from the JSON object.
    #[error("missing field {0:?}")]
    MissingField(&'static str),

    /// A field is present but its JSON shape does not match the schema.
    #[error("field {field:?} has the wrong shape, expected {expected}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A canonical string token could not be parsed back into an expression.
    #[error("malformed canonical token {0:?}")]
    MalformedCanonicalToken(String),

    /// A field value cannot be represented in the canonical string form.
    #[error("field {field:?} with value {value:?} cannot appear in a canonical token")]
    UnencodableField {
        field: &'static str,
        value: String,
    },
}
