#![deny(missing_docs)]

//! Each module of `strandcode` isolates one stage of the path from bits to bases,
//! so that the algebra, the sampling and the channel model can be reasoned about
//! independently before they are composed into a codec.
//! # strandcode
//!
//! **strandcode** transcodes binary payloads into sequences over the DNA
//! alphabet `{A, C, G, T}` in a way that survives a lossy medium: bases can
//! be substituted or dropped and whole sequences can go missing.
//!
//! ## Features
//!
//! * **GF(256) arithmetic** in [`field`]: shared exponent/log tables and the
//!   polynomial helpers used by the block codec.
//! * **Reed–Solomon block codec**: [`ReedSolomon`] appends check symbols to
//!   a byte payload and repairs any mix of errors and erasures within its
//!   designed capacity, verifying every repair before returning it.
//! * **Fountain codec**: [`FountainCodec`] spreads `K` payload blocks over
//!   `ceil(K·(1+redundancy))` droplets whose degrees follow the
//!   [`RobustSoliton`] distribution, with seeds drawn from an [`Lfsr`]; the
//!   decoder peels the droplet graph with an explicit worklist.
//! * **Collaborators**: the two-bit [`Base`] mapping, a [`ValidityScreen`]
//!   for homopolymer and GC-content bounds, a byte/bit packer, and the
//!   [`ErrorCorrection`] adapter that runs a code over whole batches of bit
//!   segments.
//!
//! ## Usage
//!
//! ```rust
//! use strandcode::{rs_decode, rs_encode};
//!
//! let payload = b"ACGT".to_vec();
//! let mut codeword = rs_encode(&payload, 4).unwrap();
//! codeword[1] ^= 0x5A;
//! codeword[6] ^= 0x01;
//! assert_eq!(rs_decode(&codeword, 4, &[]).unwrap(), payload);
//! ```
//!
//! ```rust
//! use strandcode::{FountainCodec, FountainConfig, FountainError};
//!
//! let blocks: Vec<Vec<u8>> = (0..8u8)
//!     .map(|i| (0..16).map(|b| (i >> (b % 3)) & 1).collect())
//!     .collect();
//! let codec = FountainCodec::new(FountainConfig {
//!     redundancy: 2.0,
//!     ..FountainConfig::default()
//! })
//! .unwrap();
//! let sequences = codec.encode_screened(&blocks).unwrap();
//! match codec.decode(&sequences, blocks.len()) {
//!     Ok(decoded) => assert_eq!(decoded, blocks),
//!     Err(err) => assert!(matches!(err, FountainError::Undecodable { .. })),
//! }
//! ```

pub mod alphabet;
pub mod config;
mod droplet;
pub mod ecc;
pub mod error;
pub mod field;
pub mod fountain;
pub mod packing;
mod prng;
pub mod reed_solomon;
mod soliton;
pub mod validity;

pub use alphabet::{bases_to_bits, bits_to_bases, format_sequence, parse_sequence, Base};
pub use config::{FountainConfig, RsConfig};
pub use droplet::Droplet;
pub use ecc::{ErrorCorrection, Inserted, RemovalReport, RsBitCodec};
pub use error::{
    AlphabetError, ConfigError, EccError, FieldError, FountainError, PackingError, RsError,
};
pub use field::GfTables;
pub use fountain::{fountain_decode, fountain_encode, FountainCodec};
pub use packing::{pack_bits, unpack_bits, PackedBits};
pub use prng::Lfsr;
pub use reed_solomon::{rs_decode, rs_encode, ReedSolomon};
pub use soliton::RobustSoliton;
pub use validity::ValidityScreen;
