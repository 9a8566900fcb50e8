//! Error taxonomy shared by the codecs.
//!
//! Every decode path either returns a verified value or one of the errors
//! below.  Reed–Solomon and fountain failures are scoped to a single
//! codeword or a single decode call, so callers can mark the affected data
//! as lost and carry on with the rest of a batch.

use thiserror::Error;

/// Failures raised by GF(256) arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Division (or inversion) by the zero element.
    #[error("division by zero in GF(256)")]
    DivisionByZero,
}

/// Failures raised by the Reed–Solomon block codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RsError {
    /// More erasure positions than check symbols.
    #[error("too many erasures to correct ({erasures} erasures, {check_size} check symbols)")]
    TooManyErasures {
        /// Erasure positions supplied by the caller.
        erasures: usize,
        /// Number of check symbols in the codeword.
        check_size: usize,
    },
    /// The error locator is of too high a degree for the remaining capacity,
    /// or did not have the expected number of roots.
    #[error("could not locate errors (expected {expected} roots, found {found})")]
    LocatorNotFound {
        /// Degree of the locator polynomial.
        expected: usize,
        /// Roots found by exhaustive search.
        found: usize,
    },
    /// Syndromes were still non-zero after applying the corrections.
    #[error("codeword is still corrupted after repair")]
    UncorrectableAfterRepair,
    /// Payload plus check symbols exceed the 255-symbol code length.
    #[error("codeword length {len} exceeds 255 symbols")]
    MessageTooLong {
        /// Requested codeword length.
        len: usize,
    },
    /// Received word shorter than the check symbols it must contain.
    #[error("received word of {len} symbols is shorter than {check_size} check symbols")]
    CodewordTooShort {
        /// Received length.
        len: usize,
        /// Number of check symbols.
        check_size: usize,
    },
    /// An erasure position points past the end of the received word.
    #[error("erasure position {position} out of range for codeword of {len} symbols")]
    ErasureOutOfRange {
        /// Offending position.
        position: usize,
        /// Received length.
        len: usize,
    },
    /// Internal arithmetic invariant violated.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Codec parameters rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid codec parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter is outside its admissible range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
    /// Configuration document could not be parsed.
    #[error("config decode error: {0}")]
    Decode(String),
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Failures raised while mapping bits to bases and back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    /// Bit vectors must contain an even number of bits.
    #[error("bit sequence of length {0} cannot be mapped to bases")]
    OddLength(usize),
    /// A bit vector entry was neither 0 nor 1.
    #[error("value {value} at position {position} is not a bit")]
    NotABit {
        /// Offending value.
        value: u8,
        /// Position in the input.
        position: usize,
    },
    /// A character outside `ACGT`.
    #[error("unknown base {0:?}")]
    UnknownBase(char),
}

/// Failures raised by the byte/bit packer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    /// A bit vector entry was neither 0 nor 1.
    #[error("value {value} at position {position} is not a bit")]
    NotABit {
        /// Offending value.
        value: u8,
        /// Position in the input.
        position: usize,
    },
    /// Recorded padding is larger than the unpacked bit count.
    #[error("padding of {padding} bits exceeds {available} available bits")]
    PaddingTooLarge {
        /// Recorded padding.
        padding: usize,
        /// Bits available after unpacking.
        available: usize,
    },
    /// Segment width of zero bits.
    #[error("segment width must be positive")]
    ZeroWidth,
}

/// Failures raised by the fountain codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FountainError {
    /// Input blocks are empty, ragged, of odd length, or not binary.
    #[error("invalid payload blocks: {0}")]
    InvalidBlocks(String),
    /// The validity predicate and seed constraints could not be satisfied.
    #[error("seed space exhausted after {attempts} attempts ({produced} of {required} codewords produced)")]
    SeedSpaceExhausted {
        /// Candidates drawn from the seed stream.
        attempts: u64,
        /// Codewords accepted so far.
        produced: usize,
        /// Codewords requested.
        required: usize,
    },
    /// A received sequence is too short to carry a seed header.
    #[error("sequence of {bits} bits cannot hold a {header_bits}-bit header")]
    MalformedSequence {
        /// Bits carried by the sequence.
        bits: usize,
        /// Header width.
        header_bits: u32,
    },
    /// Belief propagation stalled with blocks left unresolved.
    #[error("could not decode: {unresolved} of {total} blocks unresolved")]
    Undecodable {
        /// Blocks left without a value.
        unresolved: usize,
        /// Total blocks expected.
        total: usize,
    },
    /// Codec parameters rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Bit/base mapping failed.
    #[error(transparent)]
    Alphabet(#[from] AlphabetError),
}

/// Failures raised by the bit-segment error-correction adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EccError {
    /// Underlying Reed–Solomon failure.
    #[error(transparent)]
    Rs(#[from] RsError),
    /// Segment could not be packed into bytes.
    #[error(transparent)]
    Packing(#[from] PackingError),
    /// Verified segments must be a whole number of bytes.
    #[error("verified segment of {0} bits is not byte aligned")]
    Unaligned(usize),
    /// Segments of one batch must share a length.
    #[error("segment {index} has {len} bits, expected {expected}")]
    RaggedSegments {
        /// Position of the offending segment.
        index: usize,
        /// Its length in bits.
        len: usize,
        /// Length of the first segment.
        expected: usize,
    },
}
