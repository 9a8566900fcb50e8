//! Fountain codec for base sequences.
//!
//! Encoding draws seeds from the LFSR, turns each into a [`Droplet`] and
//! keeps the ones the validity predicate accepts until
//! `ceil(K · (1 + redundancy))` sequences exist.
//!
//! Decoding is belief propagation ("peeling") over the bipartite graph of
//! droplets and blocks.  Droplets live in an arena and every block keeps the
//! list of droplet slots that still reference it.  A droplet reduced to a
//! single block resolves that block; newly resolved blocks go on a FIFO
//! worklist, and draining the worklist XORs each resolved block out of every
//! droplet that still references it, which may resolve further blocks.

use crate::alphabet::Base;
use crate::config::FountainConfig;
use crate::droplet::Droplet;
use crate::error::{ConfigError, FountainError};
use crate::soliton::RobustSoliton;
use std::collections::{HashMap, HashSet, VecDeque};

/// Fountain encoder/decoder bound to one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FountainCodec {
    config: FountainConfig,
}

impl FountainCodec {
    /// Creates a codec after validating `config`.
    pub fn new(config: FountainConfig) -> Result<Self, FountainError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &FountainConfig {
        &self.config
    }

    /// Number of sequences produced for `block_count` blocks.
    ///
    /// Counts the seed stream cannot supply are rejected.
    pub fn codeword_count(&self, block_count: usize) -> Result<usize, FountainError> {
        let count = (block_count as f64 * (1.0 + self.config.redundancy)).ceil();
        let period = self.config.lfsr()?.period();
        if count > period as f64 {
            return Err(ConfigError::invalid(
                "redundancy",
                format!("{count} codewords for {block_count} blocks exceed the seed period {period}"),
            )
            .into());
        }
        Ok(count as usize)
    }

    /// Encodes `blocks`, keeping only sequences accepted by the configured
    /// [`ValidityScreen`](crate::ValidityScreen).
    pub fn encode_screened(&self, blocks: &[Vec<u8>]) -> Result<Vec<Vec<Base>>, FountainError> {
        let screen = self.config.screen;
        self.encode(blocks, |seq| screen.check(seq))
    }

    /// Encodes `blocks` into base sequences accepted by `is_valid`.
    ///
    /// Blocks must be non-empty, binary and of one even bit length; odd
    /// lengths are rejected rather than padded so decoded blocks always
    /// match their input length.
    pub fn encode<F>(&self, blocks: &[Vec<u8>], mut is_valid: F) -> Result<Vec<Vec<Base>>, FountainError>
    where
        F: FnMut(&[Base]) -> bool,
    {
        validate_blocks(blocks)?;
        let k = blocks.len();
        let required = self.codeword_count(k)?;
        let sampler = self.sampler(k)?;
        let mut lfsr = self.config.lfsr()?;
        let header_bits = self.config.header_bits;
        let seed_limit = if header_bits >= 64 {
            u64::MAX
        } else {
            1u64 << header_bits
        };
        let max_attempts = (required as u64)
            .saturating_mul(self.config.attempts_per_codeword)
            .min(lfsr.period());
        tracing::debug!(blocks = k, required, max_attempts, "fountain encode");

        let mut used = HashSet::new();
        let mut sequences = Vec::new();
        let mut attempts = 0u64;
        let mut rejected = 0u64;
        while sequences.len() < required {
            if attempts >= max_attempts {
                tracing::warn!(
                    attempts,
                    produced = sequences.len(),
                    required,
                    "fountain encode ran out of seeds"
                );
                return Err(FountainError::SeedSpaceExhausted {
                    attempts,
                    produced: sequences.len(),
                    required,
                });
            }
            attempts += 1;
            let seed = lfsr.next_seed();
            if seed >= seed_limit || !used.insert(seed) {
                continue;
            }
            let droplet = Droplet::encode(seed, &sampler, blocks);
            let bases = droplet.to_bases(header_bits)?;
            if is_valid(&bases) {
                sequences.push(bases);
            } else {
                rejected += 1;
                tracing::trace!(seed, "candidate rejected by validity screen");
            }
        }
        tracing::info!(
            blocks = k,
            sequences = sequences.len(),
            attempts,
            rejected,
            "fountain encode complete"
        );

        if self.config.verify_decodable {
            self.decode(&sequences, k)?;
            tracing::debug!(blocks = k, "self-check decode succeeded");
        }
        Ok(sequences)
    }

    /// Recovers `block_count` blocks from received sequences.
    ///
    /// Sequences too short for the header are skipped.  The payload length
    /// is the one shared by most parsed sequences; sequences of any other
    /// length are skipped too.
    pub fn decode(
        &self,
        sequences: &[Vec<Base>],
        block_count: usize,
    ) -> Result<Vec<Vec<u8>>, FountainError> {
        let sampler = self.sampler(block_count)?;
        let mut droplets = Vec::with_capacity(sequences.len());
        for (n, bases) in sequences.iter().enumerate() {
            match Droplet::from_bases(bases, self.config.header_bits, &sampler) {
                Ok(droplet) => droplets.push((n, droplet)),
                Err(err) => tracing::warn!(sequence = n, error = %err, "skipping sequence"),
            }
        }

        let Some(expected) = majority_len(droplets.iter().map(|(_, d)| d.payload.len())) else {
            return PeelingGraph::new(block_count).finish();
        };
        let mut graph = PeelingGraph::new(block_count);
        for (n, droplet) in droplets {
            if droplet.payload.len() != expected {
                tracing::warn!(
                    sequence = n,
                    len = droplet.payload.len(),
                    expected,
                    "skipping sequence with mismatched length"
                );
                continue;
            }
            graph.insert(droplet);
            if graph.is_complete() {
                tracing::debug!(used = n + 1, received = sequences.len(), "all blocks resolved");
                break;
            }
        }
        graph.finish()
    }

    fn sampler(&self, block_count: usize) -> Result<RobustSoliton, FountainError> {
        Ok(RobustSoliton::new(
            block_count,
            self.config.delta,
            self.config.c_dist,
        )?)
    }
}

/// Decode-time resolution state.
#[derive(Debug)]
struct PeelingGraph {
    droplets: Vec<Droplet>,
    referrers: Vec<Vec<usize>>,
    values: Vec<Option<Vec<u8>>>,
    resolved: usize,
    ripple: VecDeque<usize>,
}

impl PeelingGraph {
    fn new(block_count: usize) -> Self {
        Self {
            droplets: Vec::new(),
            referrers: vec![Vec::new(); block_count],
            values: vec![None; block_count],
            resolved: 0,
            ripple: VecDeque::new(),
        }
    }

    fn is_complete(&self) -> bool {
        self.resolved == self.values.len()
    }

    fn insert(&mut self, mut droplet: Droplet) {
        let known: Vec<usize> = droplet
            .chunk_indices
            .iter()
            .copied()
            .filter(|&i| self.values[i].is_some())
            .collect();
        for index in known {
            if let Some(block) = self.values[index].as_deref() {
                droplet.subtract(index, block);
            }
        }
        if droplet.degree() == 0 {
            return;
        }
        let slot = self.droplets.len();
        for &index in &droplet.chunk_indices {
            self.referrers[index].push(slot);
        }
        self.droplets.push(droplet);
        self.try_resolve(slot);
        self.drain();
    }

    /// Resolves the block held by a degree-one droplet.
    fn try_resolve(&mut self, slot: usize) {
        let droplet = &mut self.droplets[slot];
        if droplet.degree() != 1 {
            return;
        }
        let index = droplet.chunk_indices[0];
        droplet.chunk_indices.clear();
        let payload = std::mem::take(&mut droplet.payload);
        if self.values[index].is_none() {
            self.values[index] = Some(payload);
            self.resolved += 1;
            self.ripple.push_back(index);
        }
    }

    fn drain(&mut self) {
        while let Some(index) = self.ripple.pop_front() {
            let slots = std::mem::take(&mut self.referrers[index]);
            for slot in slots {
                if let Some(block) = self.values[index].as_deref() {
                    if !self.droplets[slot].subtract(index, block) {
                        continue;
                    }
                }
                self.try_resolve(slot);
            }
        }
    }

    fn finish(self) -> Result<Vec<Vec<u8>>, FountainError> {
        let total = self.values.len();
        let unresolved = total - self.resolved;
        if unresolved > 0 {
            tracing::debug!(unresolved, total, "fountain decode stalled");
            return Err(FountainError::Undecodable { unresolved, total });
        }
        self.values
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(FountainError::Undecodable { unresolved, total })
    }
}

/// Most frequent length; ties go to the length seen first.
fn majority_len(lens: impl Iterator<Item = usize>) -> Option<usize> {
    let mut counts: HashMap<usize, (usize, usize)> = HashMap::new();
    for (order, len) in lens.enumerate() {
        counts.entry(len).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(len, _)| len)
}

fn validate_blocks(blocks: &[Vec<u8>]) -> Result<(), FountainError> {
    let first = blocks
        .first()
        .ok_or_else(|| FountainError::InvalidBlocks("no blocks supplied".into()))?;
    let len = first.len();
    if len == 0 || len % 2 != 0 {
        return Err(FountainError::InvalidBlocks(format!(
            "block length {len} must be positive and even"
        )));
    }
    for (i, block) in blocks.iter().enumerate() {
        if block.len() != len {
            return Err(FountainError::InvalidBlocks(format!(
                "block {i} has {} bits, expected {len}",
                block.len()
            )));
        }
        if block.iter().any(|&b| b > 1) {
            return Err(FountainError::InvalidBlocks(format!(
                "block {i} contains a non-binary value"
            )));
        }
    }
    Ok(())
}

/// Encodes `blocks` with default tuning, the given redundancy and header width.
pub fn fountain_encode<F>(
    blocks: &[Vec<u8>],
    redundancy: f64,
    header_bits: u32,
    is_valid: F,
) -> Result<Vec<Vec<Base>>, FountainError>
where
    F: FnMut(&[Base]) -> bool,
{
    let config = FountainConfig {
        redundancy,
        header_bits,
        ..FountainConfig::default()
    };
    FountainCodec::new(config)?.encode(blocks, is_valid)
}

/// Decodes sequences produced by [`fountain_encode`].
pub fn fountain_decode(
    sequences: &[Vec<Base>],
    block_count: usize,
    header_bits: u32,
) -> Result<Vec<Vec<u8>>, FountainError> {
    let config = FountainConfig {
        header_bits,
        ..FountainConfig::default()
    };
    FountainCodec::new(config)?.decode(sequences, block_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn random_blocks(count: usize, bits: usize, seed: u64) -> Vec<Vec<u8>> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| (0..bits).map(|_| rng.gen_range(0..=1u8)).collect())
            .collect()
    }

    fn codec(redundancy: f64, lfsr_state: u64) -> FountainCodec {
        FountainCodec::new(FountainConfig {
            redundancy,
            lfsr_state,
            ..FountainConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_codeword_count() {
        assert_eq!(codec(0.5, 1).codeword_count(4).unwrap(), 6);
        assert_eq!(codec(0.5, 1).codeword_count(5).unwrap(), 8);
        assert_eq!(codec(0.0, 1).codeword_count(7).unwrap(), 7);
    }

    #[test]
    fn test_huge_redundancy_is_a_config_error() {
        let codec = codec(1e30, 1);
        let blocks = random_blocks(4, 16, 7);
        for result in [
            codec.codeword_count(4).map(|_| ()),
            codec.encode(&blocks, |_| true).map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(FountainError::Config(ConfigError::InvalidParameter {
                    name: "redundancy",
                    ..
                }))
            ));
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let blocks = random_blocks(12, 32, 1);
        let codec = codec(0.5, 0b1010_1010);
        let first = codec.encode(&blocks, |_| true).unwrap();
        let second = codec.encode(&blocks, |_| true).unwrap();
        assert_eq!(first.len(), 18);
        assert_eq!(first, second);
    }

    #[test]
    fn test_encoded_sequences_pass_predicate() {
        let blocks = random_blocks(16, 64, 2);
        let codec = codec(0.5, 0b101);
        let screen = codec.config().screen;
        let sequences = codec.encode_screened(&blocks).unwrap();
        assert_eq!(sequences.len(), 24);
        assert!(sequences.iter().all(|s| screen.check(s)));
        assert!(sequences.iter().all(|s| s.len() == (32 + 64) / 2));
    }

    #[test]
    fn test_round_trip_with_generous_redundancy() {
        let blocks = random_blocks(24, 32, 3);
        let mut decoded_runs = 0;
        for state in 1..=20u64 {
            let codec = codec(1.5, state * 7919);
            let sequences = codec.encode(&blocks, |_| true).unwrap();
            match codec.decode(&sequences, blocks.len()) {
                Ok(decoded) => {
                    assert_eq!(decoded, blocks);
                    decoded_runs += 1;
                }
                Err(err) => assert!(matches!(err, FountainError::Undecodable { .. })),
            }
        }
        assert!(decoded_runs >= 17, "only {decoded_runs} of 20 decoded");
    }

    #[test]
    fn test_fewer_sequences_than_blocks_is_undecodable() {
        let blocks = random_blocks(32, 16, 4);
        let codec = codec(0.0, 1);
        let sequences = codec.encode(&blocks, |_| true).unwrap();
        assert_eq!(sequences.len(), 32);
        let err = codec.decode(&sequences[..16], blocks.len()).unwrap_err();
        assert!(matches!(
            err,
            FountainError::Undecodable { unresolved, total: 32 } if unresolved >= 16
        ));
    }

    #[test]
    fn test_decode_skips_malformed_sequences() {
        let blocks = random_blocks(8, 16, 5);
        let codec = codec(3.0, 99);
        let clean = codec.encode(&blocks, |_| true).unwrap();
        let mut sequences = clean.clone();
        sequences.insert(0, vec![Base::A; 3]);
        sequences.push(vec![Base::C; 30]);
        // Malformed entries must not change the outcome.
        assert_eq!(
            codec.decode(&sequences, blocks.len()),
            codec.decode(&clean, blocks.len())
        );
    }

    #[test]
    fn test_truncated_first_sequence_does_not_set_payload_length() {
        let blocks = random_blocks(8, 16, 8);
        let mut decoded_runs = 0;
        for state in [99u64, 1_234, 56_789, 0xF00D, 0x5EED] {
            let codec = codec(3.0, state);
            let clean = codec.encode(&blocks, |_| true).unwrap();
            let mut truncated = clean[0].clone();
            truncated.pop();
            let mut sequences = vec![truncated];
            sequences.extend(clean.iter().cloned());
            let expected = codec.decode(&clean, blocks.len());
            assert_eq!(codec.decode(&sequences, blocks.len()), expected);
            if expected.is_ok() {
                decoded_runs += 1;
            }
        }
        assert!(decoded_runs >= 4, "only {decoded_runs} of 5 decoded");
    }

    #[test]
    fn test_majority_len_prefers_most_common_then_first() {
        assert_eq!(majority_len([10, 12, 12, 10, 12].into_iter()), Some(12));
        assert_eq!(majority_len([14, 10, 10, 14].into_iter()), Some(14));
        assert_eq!(majority_len(std::iter::empty()), None);
    }

    #[test]
    fn test_seeds_beyond_header_width_are_skipped() {
        let header_bits = 24;
        let blocks = random_blocks(8, 16, 9);
        let codec = FountainCodec::new(FountainConfig {
            redundancy: 3.0,
            header_bits,
            ..FountainConfig::default()
        })
        .unwrap();
        let sequences = codec.encode(&blocks, |_| true).unwrap();
        assert_eq!(sequences.len(), 32);

        let limit = 1u64 << header_bits;
        let expected: Vec<u64> = codec
            .config()
            .lfsr()
            .unwrap()
            .filter(|&seed| seed < limit)
            .take(sequences.len())
            .collect();
        // The 32-bit register leaves the 24-bit range long before 32 seeds.
        let last = expected[expected.len() - 1];
        let steps = codec.config().lfsr().unwrap().position(|seed| seed == last).unwrap() + 1;
        assert!(steps > sequences.len());

        let sampler = RobustSoliton::new(blocks.len(), 0.5, 0.1).unwrap();
        let seeds: Vec<u64> = sequences
            .iter()
            .map(|s| Droplet::from_bases(s, header_bits, &sampler).unwrap().seed)
            .collect();
        assert_eq!(seeds, expected);
        assert_eq!(codec.decode(&sequences, blocks.len()).unwrap(), blocks);
    }

    #[test]
    fn test_empty_input_is_undecodable() {
        let codec = codec(0.5, 1);
        assert_eq!(
            codec.decode(&[], 3),
            Err(FountainError::Undecodable {
                unresolved: 3,
                total: 3
            })
        );
    }

    #[test]
    fn test_rejecting_predicate_exhausts_seeds() {
        let blocks = random_blocks(4, 16, 6);
        let codec = FountainCodec::new(FountainConfig {
            attempts_per_codeword: 5,
            ..FountainConfig::default()
        })
        .unwrap();
        let err = codec.encode(&blocks, |_| false).unwrap_err();
        assert_eq!(
            err,
            FountainError::SeedSpaceExhausted {
                attempts: 30,
                produced: 0,
                required: 6
            }
        );
    }

    #[test]
    fn test_invalid_blocks_rejected() {
        let codec = codec(0.5, 1);
        let cases: Vec<Vec<Vec<u8>>> = vec![
            vec![],
            vec![vec![0, 1, 0]],
            vec![vec![0, 1], vec![0, 1, 1, 0]],
            vec![vec![0, 2]],
        ];
        for blocks in cases {
            assert!(matches!(
                codec.encode(&blocks, |_| true),
                Err(FountainError::InvalidBlocks(_))
            ));
        }
    }

    #[test]
    fn test_peeling_resolves_through_cascade() {
        let blocks = vec![vec![1, 0], vec![0, 1], vec![1, 1]];
        let mut graph = PeelingGraph::new(3);
        graph.insert(Droplet {
            seed: 1,
            chunk_indices: vec![0, 1, 2],
            payload: vec![0, 0],
        });
        graph.insert(Droplet {
            seed: 2,
            chunk_indices: vec![1, 2],
            payload: vec![1, 0],
        });
        assert!(!graph.is_complete());
        graph.insert(Droplet {
            seed: 3,
            chunk_indices: vec![2],
            payload: vec![1, 1],
        });
        assert!(graph.is_complete());
        assert_eq!(graph.finish().unwrap(), blocks);
    }
}
