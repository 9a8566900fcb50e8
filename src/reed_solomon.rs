//! Reed–Solomon block codec over GF(256).
//!
//! Codewords are systematic: the payload is followed by `check_size` check
//! symbols, and the whole word is read as a polynomial whose first symbol is
//! the highest-degree coefficient.  The generator has roots
//! `α^0, α^1, …, α^(check_size-1)`, so an intact codeword evaluates to zero
//! at every one of them.
//!
//! Decoding corrects any combination of `v` substitution errors and `e`
//! erasures with `2v + e ≤ check_size`:
//!
//! 1. erased positions are zeroed and the syndromes computed;
//! 2. Forney syndromes fold the known erasure locations out of the
//!    syndromes so Berlekamp–Massey only has to find the unknown errors;
//! 3. the error locator roots are found by exhaustive evaluation;
//! 4. Forney's formula yields the magnitude at every errata position;
//! 5. the repaired word is re-checked and rejected if any syndrome survives.

use crate::error::{ConfigError, RsError};
use crate::field::{self, alpha_pow, poly_eval, poly_mul};

/// Longest codeword representable over GF(256).
pub const MAX_CODEWORD_LEN: usize = 255;

/// Builds the generator polynomial `∏_{i<check_size} (x − α^i)`.
pub fn generator_poly(check_size: usize) -> Vec<u8> {
    let mut g = vec![1u8];
    for i in 0..check_size {
        g = poly_mul(&g, &[1, alpha_pow(i)]);
    }
    g
}

/// Systematic Reed–Solomon codec with a fixed number of check symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReedSolomon {
    check_size: usize,
    generator: Vec<u8>,
}

impl ReedSolomon {
    /// Creates a codec appending `check_size` check symbols to each payload.
    pub fn new(check_size: u8) -> Result<Self, ConfigError> {
        if check_size == 0 {
            return Err(ConfigError::invalid(
                "check_size",
                "at least one check symbol is required",
            ));
        }
        let check_size = check_size as usize;
        Ok(Self {
            check_size,
            generator: generator_poly(check_size),
        })
    }

    /// Number of check symbols appended by [`encode`](Self::encode).
    pub fn check_size(&self) -> usize {
        self.check_size
    }

    /// Generator polynomial, highest degree first.
    pub fn generator(&self) -> &[u8] {
        &self.generator
    }

    /// Appends check symbols to `payload`.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, RsError> {
        let len = payload.len() + self.check_size;
        if len > MAX_CODEWORD_LEN {
            return Err(RsError::MessageTooLong { len });
        }
        let mut out = vec![0u8; len];
        out[..payload.len()].copy_from_slice(payload);
        for i in 0..payload.len() {
            let coef = out[i];
            if coef == 0 {
                continue;
            }
            for (j, &g) in self.generator.iter().enumerate().skip(1) {
                out[i + j] ^= field::mul(g, coef);
            }
        }
        // The division overwrote the payload region with quotient terms.
        out[..payload.len()].copy_from_slice(payload);
        Ok(out)
    }

    /// Evaluates the received word at each generator root.
    pub fn syndromes(&self, word: &[u8]) -> Vec<u8> {
        (0..self.check_size)
            .map(|i| poly_eval(word, alpha_pow(i)))
            .collect()
    }

    /// Returns `true` when `word` is an intact codeword.
    pub fn check(&self, word: &[u8]) -> bool {
        self.syndromes(word).iter().all(|&s| s == 0)
    }

    /// Corrects `received` and returns the payload without check symbols.
    pub fn decode(&self, received: &[u8], erasures: &[usize]) -> Result<Vec<u8>, RsError> {
        let mut word = self.repair(received, erasures)?;
        word.truncate(word.len() - self.check_size);
        Ok(word)
    }

    /// Corrects `received` and returns the full repaired codeword.
    pub fn repair(&self, received: &[u8], erasures: &[usize]) -> Result<Vec<u8>, RsError> {
        let n = received.len();
        if n > MAX_CODEWORD_LEN {
            return Err(RsError::MessageTooLong { len: n });
        }
        if n < self.check_size {
            return Err(RsError::CodewordTooShort {
                len: n,
                check_size: self.check_size,
            });
        }
        let mut erasures = erasures.to_vec();
        erasures.sort_unstable();
        erasures.dedup();
        if let Some(&position) = erasures.iter().find(|&&p| p >= n) {
            return Err(RsError::ErasureOutOfRange { position, len: n });
        }
        if erasures.len() > self.check_size {
            return Err(RsError::TooManyErasures {
                erasures: erasures.len(),
                check_size: self.check_size,
            });
        }

        let mut word = received.to_vec();
        for &p in &erasures {
            word[p] = 0;
        }
        let synd = self.syndromes(&word);
        if synd.iter().all(|&s| s == 0) {
            return Ok(word);
        }

        let forney = forney_syndromes(&synd, &erasures, n);
        let locator = error_locator(&forney, self.check_size, erasures.len())?;
        let errors = locator.len() - 1;
        let error_positions = find_errors(&locator, n);
        // A locator of this degree cannot be trusted even if its roots exist.
        if 2 * errors + erasures.len() > self.check_size || error_positions.len() != errors {
            return Err(RsError::LocatorNotFound {
                expected: errors,
                found: error_positions.len(),
            });
        }

        let mut errata = erasures.clone();
        errata.extend(error_positions.iter().copied());
        correct_errata(&mut word, &synd, &errata)?;

        if !self.check(&word) {
            return Err(RsError::UncorrectableAfterRepair);
        }
        tracing::trace!(
            errors,
            erasures = erasures.len(),
            len = n,
            "reed-solomon codeword repaired"
        );
        Ok(word)
    }
}

/// Removes the contribution of known erasures from the syndromes.
///
/// Only the first `synd.len() - erasures.len()` entries of the result are
/// meaningful.
fn forney_syndromes(synd: &[u8], erasures: &[usize], n: usize) -> Vec<u8> {
    let mut fsynd = synd.to_vec();
    for &p in erasures {
        let x = alpha_pow(n - 1 - p);
        for j in 0..fsynd.len().saturating_sub(1) {
            fsynd[j] = field::mul(fsynd[j], x) ^ fsynd[j + 1];
        }
    }
    fsynd
}

/// Berlekamp–Massey over the (Forney) syndromes.
///
/// Returns the error locator `Λ(x)` with the highest degree first and the
/// constant term `1` last.
fn error_locator(synd: &[u8], check_size: usize, erasure_count: usize) -> Result<Vec<u8>, RsError> {
    let mut err_loc = vec![1u8];
    let mut old_loc = vec![1u8];
    for k in 0..check_size - erasure_count {
        let mut delta = synd[k];
        for j in 1..err_loc.len() {
            delta ^= field::mul(err_loc[err_loc.len() - 1 - j], synd[k - j]);
        }
        old_loc.push(0);
        if delta != 0 {
            if old_loc.len() > err_loc.len() {
                let new_loc = field::poly_scale(&old_loc, delta);
                old_loc = field::poly_scale(&err_loc, field::inverse(delta)?);
                err_loc = new_loc;
            }
            err_loc = field::poly_add(&err_loc, &field::poly_scale(&old_loc, delta));
        }
    }
    let lead = err_loc.iter().take_while(|&&c| c == 0).count();
    err_loc.drain(..lead.min(err_loc.len() - 1));
    Ok(err_loc)
}

/// Finds the positions whose locator `α^(n-1-p)` is a root of `Λ(x^-1)`.
fn find_errors(locator: &[u8], n: usize) -> Vec<usize> {
    (0..n)
        .filter(|&c| poly_eval(locator, field::pow(field::GENERATOR, -(c as i32))) == 0)
        .map(|c| n - 1 - c)
        .collect()
}

/// Applies Forney's formula at every errata position of `word`.
fn correct_errata(word: &mut [u8], synd: &[u8], errata: &[usize]) -> Result<(), RsError> {
    let n = word.len();
    let locators: Vec<u8> = errata.iter().map(|&p| alpha_pow(n - 1 - p)).collect();

    // Λ(x) = ∏ (1 + X_k x), lowest degree first.
    let mut lambda = vec![1u8];
    for &x in &locators {
        let mut next = vec![0u8; lambda.len() + 1];
        for (i, &c) in lambda.iter().enumerate() {
            next[i] ^= c;
            next[i + 1] ^= field::mul(c, x);
        }
        lambda = next;
    }

    // Ω(x) = S(x)·Λ(x) mod x^check_size, lowest degree first.
    let omega: Vec<u8> = (0..synd.len())
        .map(|i| {
            (0..=i.min(lambda.len() - 1))
                .fold(0u8, |acc, j| acc ^ field::mul(synd[i - j], lambda[j]))
        })
        .collect();
    let omega_high: Vec<u8> = omega.iter().rev().copied().collect();

    for (k, &xk) in locators.iter().enumerate() {
        let xk_inv = field::inverse(xk)?;
        let denom = locators
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != k)
            .fold(1u8, |acc, (_, &xj)| {
                field::mul(acc, 1 ^ field::mul(xj, xk_inv))
            });
        let magnitude = field::div(poly_eval(&omega_high, xk_inv), denom)?;
        word[errata[k]] ^= magnitude;
    }
    Ok(())
}

/// Encodes `payload` with `check_size` check symbols.
pub fn rs_encode(payload: &[u8], check_size: u8) -> Result<Vec<u8>, RsError> {
    ReedSolomon::new(check_size)?.encode(payload)
}

/// Decodes `received`, treating `erasures` as known-bad positions.
pub fn rs_decode(received: &[u8], check_size: u8, erasures: &[usize]) -> Result<Vec<u8>, RsError> {
    ReedSolomon::new(check_size)?.decode(received, erasures)
}
