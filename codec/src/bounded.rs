//! Bounded reads of length-prefixed payloads.
//!
//! A length prefix is attacker-controlled: a few bytes can claim a payload of 4 GiB. Rather
//! than allocating the declared size up front, payloads are pulled from the source in chunks
//! of at most [crate::Config::chunk_size] bytes. Memory therefore grows only with the bytes the
//! source actually supplies, and a short source fails after at most one chunk of speculative
//! allocation.

use crate::{Decoder, Error};
use std::io;
use tracing::trace;

/// Reads exactly `len` bytes from the decoder.
///
/// Produces the same bytes as a single `read_exact` into a `len`-sized buffer. On failure, the
/// decoder's consumed count reflects every byte actually read.
pub(crate) fn read_payload<R: io::Read>(
    decoder: &mut Decoder<R>,
    len: usize,
) -> Result<Vec<u8>, Error> {
    let chunk_size = decoder.config().chunk_size.max(1);

    // A single chunk needs no concatenation.
    if len <= chunk_size {
        let mut payload = vec![0u8; len];
        decoder.read_exact(&mut payload)?;
        return Ok(payload);
    }

    let mut chunks = Vec::new();
    let mut remaining = len;
    while remaining > 0 {
        let size = remaining.min(chunk_size);
        let mut chunk = vec![0u8; size];
        decoder.read_exact(&mut chunk)?;
        chunks.push(chunk);
        remaining -= size;
    }
    trace!(len, chunk_size, chunks = chunks.len(), "read chunked payload");
    Ok(chunks.concat())
}
