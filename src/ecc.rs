//! Error correction over bit segments.
//!
//! [`ErrorCorrection`] lifts a per-segment code to whole batches: insertion
//! reports how many bits the code adds, and removal processes every segment
//! independently so one damaged segment never prevents the rest from being
//! recovered.  [`RsBitCodec`] plugs the Reed–Solomon codec into it.

use crate::error::{EccError, RsError};
use crate::packing::{pack_bits, unpack_bits};
use crate::reed_solomon::ReedSolomon;

/// Segments with error correction added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inserted {
    /// Verified segments, in input order.
    pub segments: Vec<Vec<u8>>,
    /// Bits added to each segment.
    pub added_bits: usize,
    /// Length of the input segments, needed to strip padding on removal.
    pub original_len: usize,
}

/// Outcome of removing error correction from a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalReport {
    /// Recovered segments, in input order, failed ones omitted.
    pub segments: Vec<Vec<u8>>,
    /// Fraction of segments that could not be recovered.
    pub error_rate: f64,
    /// Input positions of the failed segments.
    pub error_indices: Vec<usize>,
    /// Raw input of each failed segment (`None` when it was missing).
    pub failed: Vec<Option<Vec<u8>>>,
}

/// A code applied independently to each bit segment.
pub trait ErrorCorrection {
    /// Adds redundancy to one segment.
    fn insert_one(&self, segment: &[u8]) -> Result<Vec<u8>, EccError>;

    /// Verifies, repairs and strips redundancy from one segment.
    fn remove_one(&self, segment: &[u8]) -> Result<Vec<u8>, EccError>;

    /// Adds redundancy to every segment.  Segments of differing lengths are
    /// rejected, since removal trims every segment to one length.
    fn insert(&self, segments: &[Vec<u8>]) -> Result<Inserted, EccError> {
        let original_len = segments.first().map_or(0, Vec::len);
        if let Some((index, s)) = segments
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != original_len)
        {
            return Err(EccError::RaggedSegments {
                index,
                len: s.len(),
                expected: original_len,
            });
        }
        let verified = segments
            .iter()
            .map(|s| self.insert_one(s))
            .collect::<Result<Vec<_>, _>>()?;
        let added_bits = verified
            .first()
            .map_or(0, |v| v.len().saturating_sub(original_len));
        Ok(Inserted {
            segments: verified,
            added_bits,
            original_len,
        })
    }

    /// Removes redundancy from every segment, keeping the last
    /// `original_len` bits of each recovered one.
    fn remove(&self, segments: &[Option<Vec<u8>>], original_len: usize) -> RemovalReport {
        let mut recovered = Vec::with_capacity(segments.len());
        let mut error_indices = Vec::new();
        let mut failed = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            let Some(segment) = segment else {
                error_indices.push(i);
                failed.push(None);
                continue;
            };
            match self.remove_one(segment) {
                Ok(data) => {
                    let start = data.len().saturating_sub(original_len);
                    recovered.push(data[start..].to_vec());
                }
                Err(err) => {
                    tracing::warn!(segment = i, error = %err, "segment could not be repaired");
                    error_indices.push(i);
                    failed.push(Some(segment.clone()));
                }
            }
        }
        let error_rate = if segments.is_empty() {
            0.0
        } else {
            error_indices.len() as f64 / segments.len() as f64
        };
        tracing::debug!(
            segments = segments.len(),
            failed = error_indices.len(),
            "error correction removed"
        );
        RemovalReport {
            segments: recovered,
            error_rate,
            error_indices,
            failed,
        }
    }
}

/// Reed–Solomon correction for bit segments.
///
/// Segments are left-padded to a byte boundary before encoding; the padding
/// stays in the verified segment and is dropped again by
/// [`ErrorCorrection::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsBitCodec {
    rs: ReedSolomon,
}

impl RsBitCodec {
    /// Wraps a Reed–Solomon codec.
    pub fn new(rs: ReedSolomon) -> Self {
        Self { rs }
    }

    /// The wrapped codec.
    pub fn codec(&self) -> &ReedSolomon {
        &self.rs
    }

    /// Repairs a verified segment, treating the listed bytes as erased.
    pub fn remove_with_erasures(&self, segment: &[u8], erasures: &[usize]) -> Result<Vec<u8>, EccError> {
        if segment.len() % 8 != 0 {
            return Err(EccError::Unaligned(segment.len()));
        }
        let bytes = pack_bits(segment)?.bytes;
        let payload = self.rs.decode(&bytes, erasures)?;
        Ok(unpack_bits(&payload, 0)?)
    }
}

impl ErrorCorrection for RsBitCodec {
    fn insert_one(&self, segment: &[u8]) -> Result<Vec<u8>, EccError> {
        let packed = pack_bits(segment)?;
        let codeword = self.rs.encode(&packed.bytes)?;
        Ok(unpack_bits(&codeword, 0)?)
    }

    fn remove_one(&self, segment: &[u8]) -> Result<Vec<u8>, EccError> {
        self.remove_with_erasures(segment, &[])
    }
}

impl From<ReedSolomon> for RsBitCodec {
    fn from(rs: ReedSolomon) -> Self {
        Self::new(rs)
    }
}

impl TryFrom<u8> for RsBitCodec {
    type Error = RsError;

    fn try_from(check_size: u8) -> Result<Self, RsError> {
        Ok(Self::new(ReedSolomon::new(check_size)?))
    }
}
