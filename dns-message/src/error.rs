use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    /// A header field holds a value wider than the bits reserved for it.
    #[error("invalid {field}: {value} does not fit (max {max})")]
    InvalidField {
        field: &'static str,
        value: u16,
        max: u16,
    },

    #[error("label of length {0} exceeds 63 octets: {1}")]
    LabelTooLong(usize, String),

    #[error("empty label in domain name")]
    EmptyLabel,

    #[error("encoded name of {0} octets exceeds 255 octets")]
    NameTooLong(usize),

    /// Fewer octets were available than the wire format requires.
    #[error("truncated message: needed {needed} octets, {available} available")]
    TruncatedMessage { needed: usize, available: usize },

    #[error("compressed or extended label octet {octet:#04x} at offset {offset}")]
    UnsupportedCompression { offset: usize, octet: u8 },

    #[error("label is not valid UTF-8: {0}")]
    EncodingError(#[from] std::str::Utf8Error),

    #[error("parsing error: {0}")]
    ParsingError(String),
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for MessageError {
    fn from(error: nom::Err<E>) -> Self {
        MessageError::ParsingError(format!("{:?}", error))
    }
}
