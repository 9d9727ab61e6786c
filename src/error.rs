//! Decode errors. Every cause is fatal for the current pass.

/// A structural problem found while walking the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("data truncated")]
    Truncated,
    #[error("invalid length-length")]
    InvalidLengthOfLength,
    #[error("refuse to handle big length-length ({0} bytes)")]
    LengthOfLengthTooBig(usize),
    /// Only reachable where `usize` is narrower than 64 bits (32-bit targets).
    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
    #[error("wrong NULL length: {0}")]
    NullLength(u64),
    #[error("wrong NULL value: 0x{0:02x}")]
    NullValue(u8),
    #[error("bitstring missing 'unused' prefix")]
    BitStringMissingUnused,
    #[error("unknown type: 0x{0:02x}")]
    UnknownTag(u8),
    #[error("element(s) were too big")]
    ElementsTooBig,
    #[error("invalid character 0x{0:02x}")]
    InvalidCharacter(u8),
    #[error("invalid UTCTime len: {0}")]
    UtcTimeLength(u64),
    #[error("nesting deeper than {0} levels")]
    MaxDepthExceeded(usize),
}

impl DecodeError {
    /// Short stable identifier, independent of the message wording.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Truncated => "truncated",
            DecodeError::InvalidLengthOfLength => "invalid_length_of_length",
            DecodeError::LengthOfLengthTooBig(_) => "length_of_length_too_big",
            DecodeError::LengthOverflow(_) => "length_overflow",
            DecodeError::NullLength(_) => "null_length",
            DecodeError::NullValue(_) => "null_value",
            DecodeError::BitStringMissingUnused => "bit_string_missing_unused",
            DecodeError::UnknownTag(_) => "unknown_tag",
            DecodeError::ElementsTooBig => "elements_too_big",
            DecodeError::InvalidCharacter(_) => "invalid_character",
            DecodeError::UtcTimeLength(_) => "utc_time_length",
            DecodeError::MaxDepthExceeded(_) => "max_depth_exceeded",
        }
    }
}

/// A [`DecodeError`] together with the cursor position at which the pass stopped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error}")]
pub struct PositionedError {
    pub offset: usize,
    #[source]
    pub error: DecodeError,
}

/// Failure to obtain input bytes.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Hex: {0}")]
    Hex(String),
}
