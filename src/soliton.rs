//! Robust soliton degree sampler.
//!
//! The degree of a fountain codeword is the number of payload blocks XORed
//! into it.  Degrees are drawn from the robust soliton distribution of Luby:
//! the ideal soliton `ρ(1) = 1/K, ρ(d) = 1/(d(d−1))` is topped up with a
//! spike `τ` that keeps enough degree-one codewords in circulation for the
//! peeling decoder to finish.  The cumulative distribution is precomputed
//! once per block count.
//!
//! Sampling is keyed by the codeword seed: a [`StdRng`] seeded with it first
//! picks the degree and then the distinct block indices, so both sides of the
//! channel derive identical index sets from the seed alone.

use crate::error::ConfigError;
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

/// Precomputed robust soliton distribution over degrees `1..=K`.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustSoliton {
    k: usize,
    delta: f64,
    c: f64,
    s: f64,
    cdf: Vec<f64>,
}

impl RobustSoliton {
    /// Builds the distribution for `k` blocks with tuning parameters
    /// `delta` (failure probability bound, in `(0, 1]`) and `c` (> 0).
    pub fn new(k: usize, delta: f64, c: f64) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::invalid("block_count", "must be positive"));
        }
        if !(delta > 0.0 && delta <= 1.0) {
            return Err(ConfigError::invalid("delta", format!("{delta} not in (0, 1]")));
        }
        if !(c > 0.0 && c.is_finite()) {
            return Err(ConfigError::invalid("c_dist", format!("{c} must be positive")));
        }
        let kf = k as f64;
        let s = c * (kf / delta).ln() * kf.sqrt();

        let mut tau = vec![0.0f64; k];
        if s > 0.0 && s.is_finite() {
            let pivot = ((kf / s).floor() as usize).clamp(1, k);
            for d in 1..pivot {
                tau[d - 1] = s / kf / d as f64;
            }
            tau[pivot - 1] = (s / kf * (s / delta).ln()).max(0.0);
        }

        let rho = (1..=k).map(|d| {
            if d == 1 {
                1.0 / kf
            } else {
                1.0 / (d as f64 * (d as f64 - 1.0))
            }
        });
        let mass: Vec<f64> = rho.zip(&tau).map(|(r, t)| r + t).collect();
        let z: f64 = mass.iter().sum();
        let mut acc = 0.0;
        let cdf = mass
            .iter()
            .map(|m| {
                acc += m / z;
                acc
            })
            .collect();
        Ok(Self {
            k,
            delta,
            c,
            s,
            cdf,
        })
    }

    /// Number of payload blocks `K`.
    pub fn block_count(&self) -> usize {
        self.k
    }

    /// Expected number of degree-one codewords, `S = c·ln(K/δ)·√K`.
    pub fn ripple_size(&self) -> f64 {
        self.s
    }

    /// Cumulative distribution; entry `d - 1` is `P(degree ≤ d)`.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Returns the smallest degree whose cumulative mass exceeds `p`.
    ///
    /// Rounding can leave the final entry just below 1, so the maximum
    /// degree is returned when no entry exceeds `p`.
    pub fn degree_at(&self, p: f64) -> usize {
        self.cdf
            .iter()
            .position(|&v| v > p)
            .map_or(self.k, |idx| idx + 1)
    }

    /// Draws the degree for `seed`.
    pub fn sample_degree(&self, seed: u64) -> usize {
        let mut rng = StdRng::seed_from_u64(seed);
        self.degree_at(rng.gen::<f64>())
    }

    /// Draws the distinct block indices combined by the codeword for `seed`.
    pub fn block_indices(&self, seed: u64) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let degree = self.degree_at(rng.gen::<f64>());
        sample(&mut rng, self.k, degree).into_vec()
    }

    /// Tuning parameter `δ`.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Tuning parameter `c`.
    pub fn c(&self) -> f64 {
        self.c
    }
}
