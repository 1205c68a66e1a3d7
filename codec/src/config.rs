//! Limits applied while decoding untrusted input.

/// Default size of a single read when pulling a length-prefixed payload (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Default maximum nesting of structs, enums and descriptor composites.
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Largest length a varint prefix can declare.
pub const MAX_LENGTH: usize = u32::MAX as usize;

/// Configuration for a [crate::Decoder].
///
/// Encoding is not configurable: the canonical form is unique.
///
/// # Examples
///
/// ```
/// use bcs_codec::Config;
///
/// let cfg = Config::default().with_max_depth(16).with_max_length(1024);
/// assert_eq!(cfg.max_depth, 16);
/// assert_eq!(cfg.max_length, 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// Maximum nesting depth before decoding fails with [crate::Error::DepthExceeded].
    pub max_depth: usize,

    /// Size of each read when pulling a length-prefixed payload from the source.
    ///
    /// At most one chunk is allocated ahead of the bytes the source has actually supplied,
    /// regardless of the declared length.
    pub chunk_size: usize,

    /// Maximum declared length (bytes or elements) of any variable-size value.
    pub max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_length: MAX_LENGTH,
        }
    }
}

impl Config {
    /// Returns the configuration with `max_depth` replaced.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the configuration with `chunk_size` replaced.
    ///
    /// A chunk size of zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Returns the configuration with `max_length` replaced (capped at [MAX_LENGTH]).
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.min(MAX_LENGTH);
        self
    }
}
