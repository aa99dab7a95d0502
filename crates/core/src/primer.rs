//! Dérivation et gestion du primer d'identification de paquet
//!
//! Le primer encadre chaque segment: `primer || segment || complément(primer)`.
//! Il est dérivé de l'identifiant du paquet par SHA-256, dont les derniers
//! octets sont rendus en bases (5 octets par défaut, soit 20 nucléotides,
//! plus de mille milliards de primers possibles).

use crate::bases;
use crate::error::{CodecError, Result};
use sha2::{Digest, Sha256};

/// Primer d'un paquet et son complément
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primer {
    sequence: String,
    complement: String,
}

impl Primer {
    /// Dérive un primer de `length` octets depuis l'identifiant du paquet
    pub fn from_package_id(package_id: &str, length: usize) -> Result<Self> {
        let digest = Sha256::digest(package_id.as_bytes());
        let tail = &digest[digest.len() - length..];
        let sequence = bases::bytes_to_dna(tail);
        let complement = bases::complement(&sequence)?;
        Ok(Self { sequence, complement })
    }

    /// Longueur du primer en bases
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Séquence du primer
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Encadre un segment: primer devant, complément derrière
    pub fn wrap(&self, segment: &str) -> String {
        let mut out = String::with_capacity(segment.len() + 2 * self.len());
        out.push_str(&self.sequence);
        out.push_str(segment);
        out.push_str(&self.complement);
        out
    }

    /// Retire le primer et son complément autour d'un segment
    ///
    /// Échoue si l'une des deux extrémités ne correspond pas exactement.
    pub fn strip<'a>(&self, segment: &'a str) -> Result<&'a str> {
        let n = self.len();
        if !segment.is_ascii() || segment.len() < 2 * n {
            return Err(CodecError::PrimerMismatch);
        }
        let (head, rest) = segment.split_at(n);
        let (inner, tail) = rest.split_at(rest.len() - n);
        if head != self.sequence || tail != self.complement {
            return Err(CodecError::PrimerMismatch);
        }
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primer_derivation_is_deterministic() {
        let p1 = Primer::from_package_id("aip:test:1", 5).unwrap();
        let p2 = Primer::from_package_id("aip:test:1", 5).unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.len(), 20);
        assert!(bases::is_valid_dna(p1.sequence()));
    }

    #[test]
    fn test_different_ids_different_primers() {
        let p1 = Primer::from_package_id("aip:test:1", 5).unwrap();
        let p2 = Primer::from_package_id("aip:test:2", 5).unwrap();
        assert_ne!(p1.sequence(), p2.sequence());
    }

    #[test]
    fn test_wrap_strip_roundtrip() {
        let primer = Primer::from_package_id("urn:example:42", 5).unwrap();
        let segment = "ATGCATGCATGC";
        let wrapped = primer.wrap(segment);
        assert_eq!(wrapped.len(), segment.len() + 40);
        assert_eq!(primer.strip(&wrapped).unwrap(), segment);
    }

    #[test]
    fn test_strip_rejects_mismatch() {
        let primer = Primer::from_package_id("urn:example:42", 5).unwrap();
        let wrapped = primer.wrap("ATGC");

        // extrémité avant altérée
        let mut bad = wrapped.clone().into_bytes();
        bad[0] = if bad[0] == b'A' { b'C' } else { b'A' };
        let bad = String::from_utf8(bad).unwrap();
        assert!(matches!(primer.strip(&bad), Err(CodecError::PrimerMismatch)));

        // segment trop court
        assert!(matches!(primer.strip("ATGC"), Err(CodecError::PrimerMismatch)));
    }
}
