use thiserror::Error;

/// Failure modes shared by every decode and string-parse operation in this
/// crate. Encoding a value that already exists can never fail, so there is no
/// encode-side counterpart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated input: structure needs {needed} bytes, buffer has {available}")]
    TruncatedInput { needed: usize, available: usize },

    #[error("unknown ACE type code {0:#04x}")]
    UnknownEnumValue(u8),

    #[error("malformed string: {0}")]
    MalformedString(String),
}
