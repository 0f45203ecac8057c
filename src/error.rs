//! Error types untuk ecword
//!
//! Semua error struktural menggagalkan operasi dan dikembalikan ke caller.
//! `ImplausibleChecksum` hanya muncul jika caller meminta mode strict.

/// Result type for ecword operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while registering layouts or encoding/decoding words
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Layout definition rejected at registration time
    #[error("Invalid layout {index}: {reason}")]
    InvalidLayout { index: u32, reason: String },

    /// Header references an index that is not registered
    #[error("Unknown layout: {0}")]
    UnknownLayout(u8),

    /// Value count differs from the layout's field count
    #[error("Arity mismatch for layout {index}: expected {expected} values, got {actual}")]
    ArityMismatch {
        index: u8,
        expected: usize,
        actual: usize,
    },

    /// Value does not fit its field's bit width
    #[error("Value {value} out of range for field {field} ({width} bits)")]
    ValueOutOfRange { field: String, value: i64, width: u8 },

    /// Input is not a valid 64-bit word representation
    #[error("Malformed word: {0}")]
    MalformedWord(String),

    /// Canonical checksum outside the plausible atomic number range
    #[error("Implausible checksum {checksum} (expected {min}..={max})")]
    ImplausibleChecksum { checksum: u32, min: u32, max: u32 },

    /// Labeled encoding named a field the layout does not have
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Labeled encoding named the same field more than once
    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    /// Word store I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Word store file exists but is not a word store
    #[error("Corrupt word store: {0}")]
    CorruptStore(String),
}

impl Error {
    pub(crate) fn invalid_layout(index: u32, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            index,
            reason: reason.into(),
        }
    }
}
