//! Codec Reed-Solomon systématique sur GF(2^m)
//!
//! Encodage par division synthétique: le mot de code vaut `message || parité`
//! avec `nsym` symboles de parité, générateur g(x) = ∏ (x − α^i), i = 0..nsym−1.
//! Les mots raccourcis sont gérés naturellement: un mot plus court que 2^m − 1
//! équivaut à un mot complet préfixé de zéros.
//!
//! Le décodage corrige erreurs et effacements: syndromes, syndromes de Forney
//! pour absorber les effacements, Berlekamp-Massey pour le localisateur
//! d'erreurs, recherche de Chien, amplitudes par l'algorithme de Forney.
//! Condition de réussite: 2·erreurs + effacements ≤ nsym.

use crate::error::{CodecError, Result};
use crate::gf::GfField;

/// Codec Reed-Solomon paramétré par un corps et un nombre de symboles de parité
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    field: GfField,
    nsym: usize,
    generator: Vec<u16>,
}

impl ReedSolomon {
    /// Crée un codec avec `nsym` symboles de parité sur le corps donné
    pub fn new(field: GfField, nsym: usize) -> Result<Self> {
        if nsym == 0 || nsym >= field.n {
            return Err(CodecError::Internal(format!(
                "nombre de symboles de parité invalide: {nsym}"
            )));
        }
        let mut generator = vec![1u16];
        for i in 0..nsym {
            generator = field.poly_mul(&generator, &[field.pow_alpha(i), 1]);
        }
        Ok(Self { field, nsym, generator })
    }

    /// Nombre de symboles de parité
    pub fn nsym(&self) -> usize {
        self.nsym
    }

    /// Corps sous-jacent
    pub fn field(&self) -> &GfField {
        &self.field
    }

    /// Encode un message: retourne `message || parité`
    pub fn encode(&self, message: &[u16]) -> Result<Vec<u16>> {
        let k = message.len();
        let n = k + self.nsym;
        if n > self.field.n {
            return Err(CodecError::Internal(format!(
                "mot de code trop long: {n} symboles pour un corps d'ordre {}",
                self.field.n
            )));
        }
        let mut codeword = vec![0u16; n];
        codeword[..k].copy_from_slice(message);
        for i in 0..k {
            let coef = codeword[i];
            if coef != 0 {
                for j in 1..=self.nsym {
                    codeword[i + j] ^= self.field.mul(self.generator[self.nsym - j], coef);
                }
            }
        }
        codeword[..k].copy_from_slice(message);
        Ok(codeword)
    }

    /// Syndromes S_j = r(α^j), j = 0..nsym−1
    ///
    /// Le symbole d'indice i correspond au coefficient de x^(n−1−i).
    pub fn syndromes(&self, codeword: &[u16]) -> Vec<u16> {
        let n = codeword.len();
        let mut out = vec![0u16; self.nsym];
        for (j, s) in out.iter_mut().enumerate() {
            for (i, &c) in codeword.iter().enumerate() {
                if c != 0 {
                    *s ^= self.field.mul(c, self.field.pow_alpha(j * (n - 1 - i)));
                }
            }
        }
        out
    }

    /// Décode un mot de code, corrigeant erreurs et effacements
    ///
    /// Retourne le message et le nombre de symboles corrigés (effacements
    /// compris). Échoue avec *Uncorrectable* au-delà de la capacité du code.
    pub fn decode(&self, codeword: &[u16], erasures: &[usize]) -> Result<(Vec<u16>, usize)> {
        let f = &self.field;
        let n = codeword.len();
        if n < self.nsym || n > f.n {
            return Err(CodecError::Internal(format!(
                "longueur de mot de code invalide: {n} pour nsym={} et un corps d'ordre {}",
                self.nsym, f.n
            )));
        }
        let k = n - self.nsym;
        if erasures.len() > self.nsym {
            return Err(CodecError::Uncorrectable(format!(
                "{} effacements pour {} symboles de parité",
                erasures.len(),
                self.nsym
            )));
        }
        if let Some(&p) = erasures.iter().find(|&&p| p >= n) {
            return Err(CodecError::Internal(format!(
                "position d'effacement hors mot de code: {p}"
            )));
        }

        let synd = self.syndromes(codeword);
        if synd.iter().all(|&s| s == 0) {
            return Ok((codeword[..k].to_vec(), 0));
        }

        // Syndromes de Forney: replie les effacements dans la suite des
        // syndromes; seuls les nsym − e premiers restent significatifs
        let mut fsynd = synd.clone();
        for &pos in erasures {
            let x = f.pow_alpha(n - 1 - pos);
            for j in 0..fsynd.len() - 1 {
                fsynd[j] = f.mul(fsynd[j], x) ^ fsynd[j + 1];
            }
        }

        let sigma = self.berlekamp_massey(&fsynd, erasures.len())?;
        let nerr = sigma.len() - 1;
        if 2 * nerr + erasures.len() > self.nsym {
            return Err(CodecError::Uncorrectable(format!(
                "{nerr} erreurs et {} effacements dépassent la capacité {}",
                erasures.len(),
                self.nsym
            )));
        }

        // Recherche de Chien des racines du localisateur
        let mut positions: Vec<usize> = Vec::with_capacity(nerr + erasures.len());
        if nerr > 0 {
            for pos in 0..n {
                let e = (pos + f.n - (n - 1)) % f.n;
                if f.poly_eval(&sigma, f.pow_alpha(e)) == 0 {
                    positions.push(pos);
                }
            }
            if positions.len() != nerr {
                return Err(CodecError::Uncorrectable(format!(
                    "localisateur de degré {nerr} pour {} racines trouvées",
                    positions.len()
                )));
            }
        }
        positions.extend_from_slice(erasures);
        positions.sort_unstable();
        positions.dedup();

        // Localisateur complet sur toutes les positions fautives
        let mut lambda = vec![1u16];
        for &pos in &positions {
            lambda = f.poly_mul(&lambda, &[1, f.pow_alpha(n - 1 - pos)]);
        }

        // Évaluateur Ω(x) = S(x)·Λ(x) mod x^nsym
        let mut omega = vec![0u16; self.nsym];
        for i in 0..self.nsym {
            for (j, &lj) in lambda.iter().enumerate() {
                if j <= i {
                    omega[i] ^= f.mul(synd[i - j], lj);
                }
            }
        }

        // Dérivée formelle: seuls les termes impairs survivent en car. 2
        let mut lambda_prime = vec![0u16; lambda.len()];
        for i in (1..lambda.len()).step_by(2) {
            lambda_prime[i - 1] = lambda[i];
        }

        let mut corrected = codeword.to_vec();
        for &pos in &positions {
            let xe = (n - 1 - pos) % f.n;
            let xj = f.pow_alpha(xe);
            let xinv = f.pow_alpha(f.n - xe);
            let denom = f.poly_eval(&lambda_prime, xinv);
            if denom == 0 {
                return Err(CodecError::Uncorrectable(
                    "dérivée du localisateur nulle".into(),
                ));
            }
            let num = f.poly_eval(&omega, xinv);
            let magnitude = f.mul(xj, f.div(num, denom)?);
            corrected[pos] ^= magnitude;
        }

        if self.syndromes(&corrected).iter().any(|&s| s != 0) {
            return Err(CodecError::Uncorrectable(
                "syndromes non nuls après correction".into(),
            ));
        }
        let ncorr = positions.len();
        corrected.truncate(k);
        Ok((corrected, ncorr))
    }

    /// Berlekamp-Massey sur les syndromes modifiés
    fn berlekamp_massey(&self, fsynd: &[u16], n_erasures: usize) -> Result<Vec<u16>> {
        let f = &self.field;
        let mut c = vec![1u16];
        let mut b = vec![1u16];
        let mut l = 0usize;
        let mut m = 1usize;
        let mut bd = 1u16;

        for r in 0..self.nsym - n_erasures {
            let mut delta = fsynd[r];
            for i in 1..=l.min(c.len() - 1) {
                delta ^= f.mul(c[i], fsynd[r - i]);
            }
            if delta == 0 {
                m += 1;
            } else if 2 * l <= r {
                let t = c.clone();
                let scale = f.mul(delta, f.inv(bd)?);
                while c.len() < b.len() + m {
                    c.push(0);
                }
                for (i, &bi) in b.iter().enumerate() {
                    c[i + m] ^= f.mul(scale, bi);
                }
                l = r + 1 - l;
                b = t;
                bd = delta;
                m = 1;
            } else {
                let scale = f.mul(delta, f.inv(bd)?);
                while c.len() < b.len() + m {
                    c.push(0);
                }
                for (i, &bi) in b.iter().enumerate() {
                    c[i + m] ^= f.mul(scale, bi);
                }
                m += 1;
            }
        }
        while c.len() > 1 && *c.last().unwrap() == 0 {
            c.pop();
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn rs(m: usize, nsym: usize) -> ReedSolomon {
        ReedSolomon::new(GfField::new(m).unwrap(), nsym).unwrap()
    }

    #[test]
    fn test_clean_roundtrip() {
        let codec = rs(8, 4);
        let msg: Vec<u16> = (0..30).map(|i| (i * 7 % 256) as u16).collect();
        let cw = codec.encode(&msg).unwrap();
        assert_eq!(cw.len(), 34);
        let (decoded, ncorr) = codec.decode(&cw, &[]).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(ncorr, 0);
    }

    #[test]
    fn test_error_correction_at_capacity() {
        let codec = rs(8, 4);
        let msg: Vec<u16> = (0..30).map(|i| (i * 13 % 256) as u16).collect();
        let mut cw = codec.encode(&msg).unwrap();
        cw[3] ^= 0x5a;
        cw[17] ^= 0x11;
        let (decoded, ncorr) = codec.decode(&cw, &[]).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(ncorr, 2);
    }

    #[test]
    fn test_beyond_capacity_fails() {
        let codec = rs(8, 4);
        let msg: Vec<u16> = (0..30).map(|i| (i * 29 % 256) as u16).collect();
        let mut cw = codec.encode(&msg).unwrap();
        cw[1] ^= 0xa1;
        cw[5] ^= 0x42;
        cw[9] ^= 0x17;
        match codec.decode(&cw, &[]) {
            Err(CodecError::Uncorrectable(_)) => {}
            Ok((decoded, _)) => assert_ne!(decoded, msg, "miscorrection silencieuse attendue"),
            Err(e) => panic!("erreur inattendue: {e}"),
        }
    }

    #[test]
    fn test_erasures_double_capacity() {
        let codec = rs(8, 4);
        let msg: Vec<u16> = (0..30).map(|i| (i * 31 % 256) as u16).collect();
        let mut cw = codec.encode(&msg).unwrap();
        // 4 effacements: au-delà de la capacité en erreurs seules
        let erased = [2usize, 8, 20, 33];
        for &p in &erased {
            cw[p] = 0;
        }
        let (decoded, ncorr) = codec.decode(&cw, &erased).unwrap();
        assert_eq!(decoded, msg);
        assert!(ncorr <= 4);
    }

    #[test]
    fn test_shortened_gf14_with_erasures_and_errors() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let codec = rs(14, 241);
        let msg: Vec<u16> = (0..361).map(|_| rng.gen_range(0..1 << 14)).collect();
        let cw = codec.encode(&msg).unwrap();
        assert_eq!(cw.len(), 602);

        let mut corrupted = cw.clone();
        let mut erased: Vec<usize> = Vec::new();
        while erased.len() < 125 {
            let p = rng.gen_range(0..602);
            if !erased.contains(&p) {
                erased.push(p);
                corrupted[p] = 0;
            }
        }
        let mut errors = 0;
        while errors < 5 {
            let p = rng.gen_range(0..602);
            if !erased.contains(&p) {
                corrupted[p] ^= rng.gen_range(1..1 << 14);
                errors += 1;
            }
        }
        erased.sort_unstable();
        let (decoded, ncorr) = codec.decode(&corrupted, &erased).unwrap();
        assert_eq!(decoded, msg);
        assert!(ncorr >= 125);
    }

    #[test]
    fn test_codeword_too_long() {
        let codec = rs(8, 4);
        let msg = vec![1u16; 255];
        assert!(codec.encode(&msg).is_err());
    }

    #[test]
    fn test_too_many_erasures() {
        let codec = rs(8, 4);
        let msg: Vec<u16> = (0..10).collect();
        let cw = codec.encode(&msg).unwrap();
        assert!(matches!(
            codec.decode(&cw, &[0, 1, 2, 3, 4]),
            Err(CodecError::Uncorrectable(_))
        ));
    }
}
