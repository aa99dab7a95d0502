//! Arithmétique sur les corps de Galois GF(2^m), m ∈ 8..=14
//!
//! Tables exp/log précalculées à la construction. L'addition est le XOR;
//! multiplication, division et inverse passent par les logarithmes. La table
//! exp est doublée pour éviter une réduction modulaire dans le produit.

use crate::error::{CodecError, Result};

/// Polynômes primitifs par largeur de symbole
const PRIMITIVE_POLYS: [(usize, u32); 7] = [
    (8, 0x11d),
    (9, 0x211),
    (10, 0x409),
    (11, 0x805),
    (12, 0x1053),
    (13, 0x201b),
    (14, 0x402b),
];

/// Corps fini GF(2^m) avec tables précalculées
#[derive(Debug, Clone)]
pub struct GfField {
    m: usize,
    /// Ordre du groupe multiplicatif: 2^m − 1
    pub n: usize,
    exp: Vec<u16>,
    log: Vec<u16>,
}

impl GfField {
    /// Construit le corps GF(2^m) et ses tables
    pub fn new(m: usize) -> Result<Self> {
        let prim = PRIMITIVE_POLYS
            .iter()
            .find(|&&(width, _)| width == m)
            .map(|&(_, p)| p)
            .ok_or_else(|| {
                CodecError::Internal(format!("largeur de symbole non supportée: m={m}"))
            })?;

        let n = (1usize << m) - 1;
        let mut exp = vec![0u16; 2 * n];
        let mut log = vec![0u16; n + 1];
        let mut x: u32 = 1;
        for i in 0..n {
            exp[i] = x as u16;
            log[x as usize] = i as u16;
            x <<= 1;
            if x & (1 << m) != 0 {
                x ^= prim;
            }
        }
        for i in n..2 * n {
            exp[i] = exp[i - n];
        }
        Ok(Self { m, n, exp, log })
    }

    /// Largeur des symboles en bits
    pub fn symbol_bits(&self) -> usize {
        self.m
    }

    /// Addition (= soustraction) dans le corps
    #[inline]
    pub fn add(&self, a: u16, b: u16) -> u16 {
        a ^ b
    }

    /// Multiplication
    #[inline]
    pub fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
    }

    /// Division; `b` doit être non nul
    #[inline]
    pub fn div(&self, a: u16, b: u16) -> Result<u16> {
        if b == 0 {
            return Err(CodecError::Internal("division par zéro dans GF(2^m)".into()));
        }
        if a == 0 {
            return Ok(0);
        }
        let idx = self.log[a as usize] as usize + self.n - self.log[b as usize] as usize;
        Ok(self.exp[idx])
    }

    /// Inverse multiplicatif; `a` doit être non nul
    #[inline]
    pub fn inv(&self, a: u16) -> Result<u16> {
        if a == 0 {
            return Err(CodecError::Internal("inverse de zéro dans GF(2^m)".into()));
        }
        Ok(self.exp[(self.n - self.log[a as usize] as usize) % self.n])
    }

    /// Puissance de l'élément primitif: α^e
    #[inline]
    pub fn pow_alpha(&self, e: usize) -> u16 {
        self.exp[e % self.n]
    }

    /// Produit de deux polynômes à coefficients dans le corps
    /// (coefficient de x^0 en tête)
    pub fn poly_mul(&self, a: &[u16], b: &[u16]) -> Vec<u16> {
        let mut out = vec![0u16; a.len() + b.len() - 1];
        for (i, &ai) in a.iter().enumerate() {
            if ai != 0 {
                for (j, &bj) in b.iter().enumerate() {
                    out[i + j] ^= self.mul(ai, bj);
                }
            }
        }
        out
    }

    /// Évaluation d'un polynôme en x par le schéma de Horner
    pub fn poly_eval(&self, poly: &[u16], x: u16) -> u16 {
        let mut r = 0u16;
        for &c in poly.iter().rev() {
            r = self.mul(r, x) ^ c;
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_construction() {
        for m in 8..=14 {
            let f = GfField::new(m).unwrap();
            assert_eq!(f.n, (1 << m) - 1);
        }
        assert!(GfField::new(7).is_err());
    }

    #[test]
    fn test_exp_log_consistency() {
        let f = GfField::new(14).unwrap();
        // α engendre tout le groupe multiplicatif
        for a in [1u16, 2, 3, 1000, 16000, 16383] {
            assert_eq!(f.pow_alpha(f.log[a as usize] as usize), a);
        }
    }

    #[test]
    fn test_mul_div_inverse() {
        for m in [8usize, 14] {
            let f = GfField::new(m).unwrap();
            let samples: Vec<u16> = (1..200).map(|i| (i * 37 % f.n + 1) as u16).collect();
            for &a in &samples {
                assert_eq!(f.mul(a, f.inv(a).unwrap()), 1);
                for &b in samples.iter().take(10) {
                    let p = f.mul(a, b);
                    assert_eq!(f.div(p, b).unwrap(), a);
                }
            }
        }
    }

    #[test]
    fn test_div_by_zero() {
        let f = GfField::new(8).unwrap();
        assert!(f.div(5, 0).is_err());
        assert!(f.inv(0).is_err());
    }

    #[test]
    fn test_poly_eval() {
        let f = GfField::new(8).unwrap();
        // p(x) = 3 + 2x + x^2 en x=1: 3 ^ 2 ^ 1 = 0
        assert_eq!(f.poly_eval(&[3, 2, 1], 1), 0);
        assert_eq!(f.poly_eval(&[7], 123), 7);
        assert_eq!(f.poly_eval(&[], 5), 0);
    }
}
