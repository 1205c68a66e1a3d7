//! Error types for codec operations

use std::io;
use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of input")]
    Truncated,
    #[error("non-canonical varint")]
    NonCanonical,
    #[error("varint overflow")]
    Overflow,
    #[error("value out of varint range: {0}")]
    OutOfRange(u64),
    #[error("length exceeded: {0} > {1}")]
    LengthExceeded(usize, usize), // found, max
    #[error("variant out of range: {0} >= {1}")]
    VariantOutOfRange(u32, u32), // index, count
    #[error("no variant populated in {0}")]
    EmptyUnion(String),
    #[error("invalid field policy: {0}")]
    InvalidFieldPolicy(String),
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
    #[error("invalid presence byte: {0}")]
    InvalidPresence(u8),
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("depth limit exceeded: {0}")]
    DepthExceeded(usize),
    #[error("trailing bytes: {0}")]
    TrailingBytes(usize),
    #[error("custom: {0}")]
    Custom(String),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

/// An [Error] annotated with the number of bytes consumed (when decoding) or
/// produced (when encoding) before it occurred.
#[derive(Error, Debug)]
#[error("{error} (at byte {position})")]
pub struct Failure {
    /// Bytes consumed or produced before the failure.
    pub position: usize,

    /// The underlying error.
    #[source]
    pub error: Error,
}

impl Failure {
    pub fn new(position: usize, error: Error) -> Self {
        Self { position, error }
    }
}
