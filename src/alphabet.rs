//! Nucleotide alphabet and the fixed two-bits-per-base mapping.
//!
//! The mapping is `00 ↔ A`, `01 ↔ C`, `10 ↔ G`, `11 ↔ T`; bit vectors are
//! slices of `u8` holding only 0 or 1, read two at a time with the first bit
//! as the high bit.

use crate::error::AlphabetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four DNA bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Base {
    /// Adenine, bits `00`.
    A,
    /// Cytosine, bits `01`.
    C,
    /// Guanine, bits `10`.
    G,
    /// Thymine, bits `11`.
    T,
}

impl Base {
    /// All bases in index order.
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Two-bit index of the base.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Base::A => 0,
            Base::C => 1,
            Base::G => 2,
            Base::T => 3,
        }
    }

    /// Base for a two-bit index; only the low two bits are read.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index & 0b11) as usize]
    }

    /// Character representation.
    pub fn as_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// `true` for G and C.
    #[inline]
    pub fn is_gc(self) -> bool {
        matches!(self, Base::G | Base::C)
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Base {
    type Error = AlphabetError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'T' => Ok(Base::T),
            _ => Err(AlphabetError::UnknownBase(c)),
        }
    }
}

/// Maps a bit vector onto bases, two bits per base.
pub fn bits_to_bases(bits: &[u8]) -> Result<Vec<Base>, AlphabetError> {
    if bits.len() % 2 != 0 {
        return Err(AlphabetError::OddLength(bits.len()));
    }
    if let Some((position, &value)) = bits.iter().enumerate().find(|(_, &b)| b > 1) {
        return Err(AlphabetError::NotABit { value, position });
    }
    Ok(bits
        .chunks_exact(2)
        .map(|pair| Base::from_index(pair[0] << 1 | pair[1]))
        .collect())
}

/// Maps bases back to a bit vector.
pub fn bases_to_bits(bases: &[Base]) -> Vec<u8> {
    bases
        .iter()
        .flat_map(|b| {
            let i = b.index();
            [i >> 1, i & 1]
        })
        .collect()
}

/// Parses a textual sequence such as `"ACGT"`.
pub fn parse_sequence(text: &str) -> Result<Vec<Base>, AlphabetError> {
    text.trim().chars().map(Base::try_from).collect()
}

/// Renders bases as text.
pub fn format_sequence(bases: &[Base]) -> String {
    bases.iter().map(|b| b.as_char()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table() {
        let bases = bits_to_bases(&[0, 0, 0, 1, 1, 0, 1, 1]).unwrap();
        assert_eq!(bases, vec![Base::A, Base::C, Base::G, Base::T]);
        assert_eq!(bases_to_bits(&bases), vec![0, 0, 0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn test_rejects_malformed_bits() {
        assert_eq!(bits_to_bases(&[1, 0, 1]), Err(AlphabetError::OddLength(3)));
        assert_eq!(
            bits_to_bases(&[0, 2]),
            Err(AlphabetError::NotABit {
                value: 2,
                position: 1
            })
        );
    }

    #[test]
    fn test_text_form() {
        let bases = parse_sequence("acgT\n").unwrap();
        assert_eq!(format_sequence(&bases), "ACGT");
        assert_eq!(parse_sequence("ACXG"), Err(AlphabetError::UnknownBase('X')));
    }

    #[test]
    fn test_gc_classification() {
        let gc: Vec<bool> = Base::ALL.iter().map(|b| b.is_gc()).collect();
        assert_eq!(gc, vec![false, true, true, false]);
    }
}
