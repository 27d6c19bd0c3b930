//! Single-shot zlib (RFC 1950) compression of an in-memory byte buffer.
//!
//! This is the only component backed by a third-party crate: `flate2`, built
//! on `miniz_oxide` by default, gives us a conformant zlib wrapper around
//! DEFLATE without hand-rolling Huffman coding. Both directions are
//! single-shot — the whole buffer in, the whole buffer out — matching how
//! the orchestrator uses this layer (no streaming).

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{PspError, Result};

/// Compresses `data` with zlib at the default compression level.
///
/// The `ZlibEncoder` is dropped (and its native compression context freed)
/// as soon as `finish()` returns, on every exit path including error.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PspError::new(format!("zlib deflate failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| PspError::new(format!("zlib deflate failed: {e}")))
}

/// Inflates a zlib-wrapped buffer produced by [`compress`] (or any
/// conformant zlib encoder).
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| PspError::new(format!("zlib inflate failed: {e}")))?;
    Ok(out)
}
