//! Each module of `strandcode` isolates one stage of the path from bits to bases,
//! so that the algebra, the sampling and the channel model can be reasoned about
//! independently before they are composed into a codec.
//! Finite field arithmetic over GF(256).
//!
//! Elements are bytes.  Multiplication and division go through exponent and
//! logarithm tables generated from the primitive polynomial `0x11D`; the
//! tables are built once per process and shared read-only by every codec.
//! Polynomials are coefficient vectors with the highest degree first.

use crate::error::FieldError;
use once_cell::sync::Lazy;

/// Primitive polynomial `x^8 + x^4 + x^3 + x^2 + 1`.
pub const PRIMITIVE_POLY: u16 = 0x11D;

/// Generator element α used for the Reed–Solomon roots.
pub const GENERATOR: u8 = 2;

static TABLES: Lazy<GfTables> = Lazy::new(|| GfTables::build(PRIMITIVE_POLY));

/// Exponent and logarithm tables for GF(256).
///
/// `exp` holds 512 entries so that `exp[log a + log b]` can be indexed
/// without reducing the exponent sum modulo 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

impl GfTables {
    /// Builds the tables for the given primitive polynomial.
    pub fn build(primitive: u16) -> Self {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= primitive;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        Self { exp, log }
    }

    /// Returns the process-wide tables for [`PRIMITIVE_POLY`].
    #[inline]
    pub fn shared() -> &'static GfTables {
        &TABLES
    }

    /// Exponent table (`α^i`).
    pub fn exp_table(&self) -> &[u8; 512] {
        &self.exp
    }

    /// Logarithm table (`log_α a`); entry 0 is unused.
    pub fn log_table(&self) -> &[u8; 256] {
        &self.log
    }
}

/// Adds two elements (XOR).
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Subtracts `b` from `a`; identical to addition in characteristic 2.
#[inline]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiplies two elements.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = GfTables::shared();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// Divides `a` by `b`.
#[inline]
pub fn div(a: u8, b: u8) -> Result<u8, FieldError> {
    if b == 0 {
        return Err(FieldError::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let t = GfTables::shared();
    Ok(t.exp[(t.log[a as usize] as usize + 255 - t.log[b as usize] as usize) % 255])
}

/// Raises `a` to the (possibly negative) power `e`.
pub fn pow(a: u8, e: i32) -> u8 {
    if a == 0 {
        return if e == 0 { 1 } else { 0 };
    }
    let t = GfTables::shared();
    let idx = (t.log[a as usize] as i64 * e as i64).rem_euclid(255);
    t.exp[idx as usize]
}

/// Returns `α^e` for the generator α.
#[inline]
pub fn alpha_pow(e: usize) -> u8 {
    GfTables::shared().exp[e % 255]
}

/// Returns the multiplicative inverse of `a`.
#[inline]
pub fn inverse(a: u8) -> Result<u8, FieldError> {
    div(1, a)
}

/// Discrete logarithm of a non-zero element.
#[inline]
pub fn log(a: u8) -> Result<u8, FieldError> {
    if a == 0 {
        return Err(FieldError::DivisionByZero);
    }
    Ok(GfTables::shared().log[a as usize])
}

/// Multiplies every coefficient of `p` by `x`.
pub fn poly_scale(p: &[u8], x: u8) -> Vec<u8> {
    p.iter().map(|&c| mul(c, x)).collect()
}

/// Adds two polynomials, aligning them at the constant term.
pub fn poly_add(p: &[u8], q: &[u8]) -> Vec<u8> {
    let len = p.len().max(q.len());
    let mut r = vec![0u8; len];
    r[len - p.len()..].copy_from_slice(p);
    for (i, &c) in q.iter().enumerate() {
        r[i + len - q.len()] ^= c;
    }
    r
}

/// Multiplies two polynomials.
pub fn poly_mul(p: &[u8], q: &[u8]) -> Vec<u8> {
    if p.is_empty() || q.is_empty() {
        return Vec::new();
    }
    let mut r = vec![0u8; p.len() + q.len() - 1];
    for (j, &qc) in q.iter().enumerate() {
        if qc == 0 {
            continue;
        }
        for (i, &pc) in p.iter().enumerate() {
            r[i + j] ^= mul(pc, qc);
        }
    }
    r
}

/// Evaluates `p` at `x` using Horner's rule.
pub fn poly_eval(p: &[u8], x: u8) -> u8 {
    p.iter().fold(0u8, |acc, &c| mul(acc, x) ^ c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_idempotent() {
        let first = GfTables::build(PRIMITIVE_POLY);
        let second = GfTables::build(PRIMITIVE_POLY);
        assert_eq!(first, second);
        assert_eq!(&first, GfTables::shared());
    }

    #[test]
    fn test_exp_table_known_values() {
        let t = GfTables::shared();
        assert_eq!(t.exp_table()[0], 1);
        assert_eq!(t.exp_table()[1], 2);
        assert_eq!(t.exp_table()[7], 128);
        // 2^8 reduced by 0x11D.
        assert_eq!(t.exp_table()[8], 0x1D);
        assert_eq!(t.exp_table()[255], 1);
    }

    #[test]
    fn test_log_inverts_exp() {
        for a in 1..=255u8 {
            assert_eq!(alpha_pow(log(a).unwrap() as usize), a);
        }
    }

    #[test]
    fn test_mul_div_inverse() {
        for a in 0..=255u8 {
            for b in 1..=255u8 {
                let prod = mul(a, b);
                assert_eq!(div(prod, b).unwrap(), a);
            }
        }
        for a in 1..=255u8 {
            assert_eq!(mul(a, inverse(a).unwrap()), 1);
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(div(7, 0), Err(FieldError::DivisionByZero));
        assert_eq!(inverse(0), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn test_pow_matches_repeated_mul() {
        let a = 0x53;
        let mut acc = 1u8;
        for e in 0..20 {
            assert_eq!(pow(a, e), acc);
            acc = mul(acc, a);
        }
        assert_eq!(mul(pow(a, -1), a), 1);
    }

    #[test]
    fn test_poly_helpers() {
        // (x + 1)(x + 2) = x^2 + 3x + 2
        assert_eq!(poly_mul(&[1, 1], &[1, 2]), vec![1, 3, 2]);
        assert_eq!(poly_add(&[1, 0, 0], &[5]), vec![1, 0, 5]);
        assert_eq!(poly_add(&[5], &[1, 0, 0]), vec![1, 0, 5]);
        assert_eq!(poly_scale(&[1, 3], 2), vec![2, 6]);
        assert_eq!(poly_eval(&[1, 3, 2], 1), 1 ^ 3 ^ 2);
        assert_eq!(poly_eval(&[1, 3, 2], 0), 2);
    }
}
