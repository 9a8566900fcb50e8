//! Conversions between bytes and bit vectors.
//!
//! The Reed–Solomon codec works on bytes while payload blocks are bit
//! vectors of arbitrary length.  [`pack_bits`] left-pads a block with zero
//! bits up to a byte boundary and reports how many were added; the caller
//! keeps that count and hands it back to [`unpack_bits`] after decoding.

use crate::error::PackingError;

/// Bytes produced from a bit vector plus the number of leading pad bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    /// Packed bytes, most significant bit first.
    pub bytes: Vec<u8>,
    /// Zero bits prepended to reach a byte boundary.
    pub padding: usize,
}

/// Packs a bit vector into bytes, most significant bit first.
pub fn pack_bits(bits: &[u8]) -> Result<PackedBits, PackingError> {
    if let Some((position, &value)) = bits.iter().enumerate().find(|(_, &b)| b > 1) {
        return Err(PackingError::NotABit { value, position });
    }
    let padding = (8 - bits.len() % 8) % 8;
    let padded = std::iter::repeat(0u8).take(padding).chain(bits.iter().copied());
    let mut bytes = Vec::with_capacity((bits.len() + padding) / 8);
    let mut acc = 0u8;
    for (i, bit) in padded.enumerate() {
        acc = acc << 1 | bit;
        if i % 8 == 7 {
            bytes.push(acc);
            acc = 0;
        }
    }
    Ok(PackedBits { bytes, padding })
}

/// Unpacks bytes into bits and strips `padding` leading bits.
pub fn unpack_bits(bytes: &[u8], padding: usize) -> Result<Vec<u8>, PackingError> {
    let available = bytes.len() * 8;
    if padding > available {
        return Err(PackingError::PaddingTooLarge { padding, available });
    }
    Ok(bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
        .skip(padding)
        .collect())
}

/// Splits raw bytes into bit segments of `segment_bits` bits each.
///
/// The final segment is zero-filled at the end; the caller records the
/// original byte length to trim it after decoding.
pub fn bytes_to_segments(data: &[u8], segment_bits: usize) -> Result<Vec<Vec<u8>>, PackingError> {
    if segment_bits == 0 {
        return Err(PackingError::ZeroWidth);
    }
    let bits = unpack_bits(data, 0)?;
    Ok(bits
        .chunks(segment_bits)
        .map(|chunk| {
            let mut segment = chunk.to_vec();
            segment.resize(segment_bits, 0);
            segment
        })
        .collect())
}

/// Joins bit segments back into bytes, truncated to `byte_len`.
pub fn segments_to_bytes(segments: &[Vec<u8>], byte_len: usize) -> Result<Vec<u8>, PackingError> {
    let mut bits: Vec<u8> = segments.iter().flatten().copied().collect();
    bits.truncate(byte_len * 8);
    let mut bytes = pack_bits(&bits)?.bytes;
    bytes.truncate(byte_len);
    Ok(bytes)
}
