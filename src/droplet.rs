//! Fountain codewords.
//!
//! A droplet carries a seed and the XOR of the payload blocks that the seed
//! selects.  On the wire it is a fixed-width seed header (least significant
//! bit first) followed by the payload bits, mapped two bits per base.

use crate::alphabet::{bases_to_bits, bits_to_bases, Base};
use crate::error::{AlphabetError, FountainError};
use crate::soliton::RobustSoliton;

/// One fountain codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Droplet {
    /// Seed that determines the combined blocks.
    pub seed: u64,
    /// Blocks still XORed into `payload`.
    pub chunk_indices: Vec<usize>,
    /// XOR of the blocks listed in `chunk_indices`.
    pub payload: Vec<u8>,
}

impl Droplet {
    /// Builds the droplet for `seed` from the full block set.
    ///
    /// All blocks must share the same length.
    pub fn encode(seed: u64, sampler: &RobustSoliton, blocks: &[Vec<u8>]) -> Self {
        let chunk_indices = sampler.block_indices(seed);
        let mut payload = vec![0u8; blocks.first().map_or(0, Vec::len)];
        for &idx in &chunk_indices {
            xor_into(&mut payload, &blocks[idx]);
        }
        Self {
            seed,
            chunk_indices,
            payload,
        }
    }

    /// Number of blocks still combined in the payload.
    pub fn degree(&self) -> usize {
        self.chunk_indices.len()
    }

    /// Serialises header and payload as a bit vector.
    pub fn to_bits(&self, header_bits: u32) -> Vec<u8> {
        let mut bits = Vec::with_capacity(header_bits as usize + self.payload.len());
        bits.extend((0..header_bits).map(|i| ((self.seed >> i) & 1) as u8));
        bits.extend_from_slice(&self.payload);
        bits
    }

    /// Serialises the droplet as bases.
    pub fn to_bases(&self, header_bits: u32) -> Result<Vec<Base>, AlphabetError> {
        bits_to_bases(&self.to_bits(header_bits))
    }

    /// Rebuilds a droplet from received bits, recomputing its block indices.
    pub fn from_bits(
        bits: &[u8],
        header_bits: u32,
        sampler: &RobustSoliton,
    ) -> Result<Self, FountainError> {
        let header = header_bits as usize;
        if bits.len() < header {
            return Err(FountainError::MalformedSequence {
                bits: bits.len(),
                header_bits,
            });
        }
        let seed = bits[..header]
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b & 1) << i));
        Ok(Self {
            seed,
            chunk_indices: sampler.block_indices(seed),
            payload: bits[header..].to_vec(),
        })
    }

    /// Rebuilds a droplet from a received base sequence.
    pub fn from_bases(
        bases: &[Base],
        header_bits: u32,
        sampler: &RobustSoliton,
    ) -> Result<Self, FountainError> {
        Self::from_bits(&bases_to_bits(bases), header_bits, sampler)
    }

    /// XORs a resolved block out of the payload.
    ///
    /// Returns `false` when the droplet did not reference `index`.
    pub fn subtract(&mut self, index: usize, block: &[u8]) -> bool {
        match self.chunk_indices.iter().position(|&i| i == index) {
            Some(pos) => {
                self.chunk_indices.swap_remove(pos);
                xor_into(&mut self.payload, block);
                true
            }
            None => false,
        }
    }
}

fn xor_into(acc: &mut [u8], block: &[u8]) {
    for (a, &b) in acc.iter_mut().zip(block) {
        *a ^= b;
    }
}
