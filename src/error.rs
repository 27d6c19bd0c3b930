use std::fmt;

/// The single error kind surfaced by this crate's public API.
///
/// Internally the codec distinguishes three failure classes — a domain
/// violation on the input, malformed wire data, or a downstream zlib error —
/// but all of them are reported through this one type, each carrying a
/// human-readable message naming the offending byte, day, or bin where
/// applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PspError {
    message: String,
}

impl PspError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable message describing the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PspError {}

pub type Result<T> = std::result::Result<T, PspError>;
