//! Synthesis-friendliness screening for base sequences.
//!
//! Long homopolymer runs and skewed GC content are hard to synthesise and
//! sequence.  The fountain encoder takes any `FnMut(&[Base]) -> bool` as its
//! acceptance test; [`ValidityScreen`] is the standard one.

use crate::alphabet::Base;
use serde::{Deserialize, Serialize};

/// Homopolymer and GC-content bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityScreen {
    /// Longest permitted run of a single base.
    pub max_homopolymer: usize,
    /// Upper GC fraction bound; the lower bound is `1 - max_gc_content`.
    pub max_gc_content: f64,
}

impl Default for ValidityScreen {
    fn default() -> Self {
        Self {
            max_homopolymer: 4,
            max_gc_content: 0.7,
        }
    }
}

impl ValidityScreen {
    /// Creates a screen from a run limit and a GC bound.
    pub fn new(max_homopolymer: usize, max_gc_content: f64) -> Self {
        Self {
            max_homopolymer,
            max_gc_content,
        }
    }

    /// Returns `true` when `sequence` passes every bound.
    pub fn check(&self, sequence: &[Base]) -> bool {
        self.homopolymer_ok(sequence) && self.gc_content_ok(sequence)
    }

    /// Returns `true` when no run exceeds `max_homopolymer`.
    pub fn homopolymer_ok(&self, sequence: &[Base]) -> bool {
        longest_run(sequence) <= self.max_homopolymer
    }

    /// Returns `true` when the GC fraction lies in `[1 - max, max]`.
    ///
    /// The empty sequence has no defined GC fraction and is rejected.
    pub fn gc_content_ok(&self, sequence: &[Base]) -> bool {
        if sequence.is_empty() {
            return false;
        }
        let gc = gc_fraction(sequence);
        1.0 - self.max_gc_content <= gc && gc <= self.max_gc_content
    }
}

/// Length of the longest single-base run.
pub fn longest_run(sequence: &[Base]) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut prev = None;
    for &b in sequence {
        run = if prev == Some(b) { run + 1 } else { 1 };
        prev = Some(b);
        best = best.max(run);
    }
    best
}

/// Fraction of G and C bases.
pub fn gc_fraction(sequence: &[Base]) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    sequence.iter().filter(|b| b.is_gc()).count() as f64 / sequence.len() as f64
}
