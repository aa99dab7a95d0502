//! Conversions entre octets, valeurs de bases et chaînes ADN
//!
//! Chaque base porte 2 bits avec l'ordre A=0b00, G=0b01, C=0b10, T=0b11.
//! Cet ordre rend le complément d'une base égal à la négation bit à bit
//! de son code (A↔T, G↔C), donc `complement` est une involution triviale.

use crate::error::{CodecError, Result};

/// Alphabet dans l'ordre des codes 2 bits
pub const BASE_CHARS: [char; 4] = ['A', 'G', 'C', 'T'];

/// Caractères tolérés autour d'un segment dans un fichier texte
const STRIP_CHARS: &[char] = &['.', ',', '-', '\t', ' ', ';', '"', '\'', '\r'];

/// Convertit une valeur de base (0..=3) en caractère
#[inline]
pub fn base_to_char(value: u8) -> char {
    BASE_CHARS[(value & 3) as usize]
}

/// Convertit un caractère en valeur de base (0..=3)
#[inline]
pub fn char_to_base(c: char) -> Result<u8> {
    match c {
        'A' => Ok(0),
        'G' => Ok(1),
        'C' => Ok(2),
        'T' => Ok(3),
        _ => Err(CodecError::InvalidBase(c)),
    }
}

/// Éclate un octet en 4 valeurs de bases, bits de poids fort en premier
#[inline]
pub fn byte_to_bases(b: u8) -> [u8; 4] {
    [(b >> 6) & 3, (b >> 4) & 3, (b >> 2) & 3, b & 3]
}

/// Regroupe 4 valeurs de bases en un octet
#[inline]
pub fn bases_to_byte(q: &[u8]) -> u8 {
    (q[0] << 6) | (q[1] << 4) | (q[2] << 2) | q[3]
}

/// Convertit des octets en chaîne ADN (4 bases par octet)
pub fn bytes_to_dna(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 4);
    for &b in data {
        for v in byte_to_bases(b) {
            out.push(base_to_char(v));
        }
    }
    out
}

/// Convertit une chaîne ADN en octets
///
/// La longueur doit être un multiple de 4, chaque caractère dans {A,T,G,C}.
pub fn dna_to_bytes(dna: &str) -> Result<Vec<u8>> {
    let values = dna_to_values(dna)?;
    if values.len() % 4 != 0 {
        return Err(CodecError::InvalidLength {
            len: values.len(),
            multiple: 4,
        });
    }
    Ok(values.chunks_exact(4).map(bases_to_byte).collect())
}

/// Convertit une chaîne ADN en valeurs de bases
pub fn dna_to_values(dna: &str) -> Result<Vec<u8>> {
    dna.chars().map(char_to_base).collect()
}

/// Convertit des valeurs de bases en chaîne ADN
pub fn values_to_dna(values: &[u8]) -> String {
    values.iter().map(|&v| base_to_char(v)).collect()
}

/// Complément d'une valeur de base: négation bit à bit sur 2 bits
#[inline]
pub fn complement_base(value: u8) -> u8 {
    3 - (value & 3)
}

/// Complément d'une chaîne ADN, base par base
pub fn complement(dna: &str) -> Result<String> {
    let mut out = String::with_capacity(dna.len());
    for c in dna.chars() {
        out.push(base_to_char(complement_base(char_to_base(c)?)));
    }
    Ok(out)
}

/// Regroupe des valeurs de bases en symboles de `block_size` bases (2 bits
/// chacune, poids fort en premier). Le dernier symbole est complété par des
/// zéros en position basse si le tableau n'est pas un multiple entier.
pub fn merge_bases(values: &[u8], block_size: usize) -> Vec<u16> {
    let blocks = values.len().div_ceil(block_size);
    let mut out = Vec::with_capacity(blocks);
    for i in 0..blocks {
        let span = block_size.min(values.len() - i * block_size);
        let mut n: u16 = 0;
        for j in 0..span {
            n += u16::from(values[i * block_size + j]) << (2 * (block_size - j - 1));
        }
        out.push(n);
    }
    out
}

/// Éclate des symboles en valeurs de bases, `block_size` bases par symbole
pub fn split_bases(symbols: &[u16], block_size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(symbols.len() * block_size);
    for &s in symbols {
        for j in 0..block_size {
            out.push(((s >> (2 * (block_size - j - 1))) & 3) as u8);
        }
    }
    out
}

/// Retire la ponctuation et les espaces autour d'un segment
pub fn strip_segment(line: &str) -> &str {
    line.trim_matches(STRIP_CHARS)
}

/// Vérifie que la chaîne ne contient que des bases standard
pub fn is_valid_dna(s: &str) -> bool {
    s.chars().all(|c| matches!(c, 'A' | 'T' | 'G' | 'C'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_byte_bases_roundtrip() {
        for b in 0..=255u8 {
            let q = byte_to_bases(b);
            assert!(q.iter().all(|&v| v <= 3));
            assert_eq!(bases_to_byte(&q), b);
        }
    }

    #[test]
    fn test_dna_conversion() {
        assert_eq!(bytes_to_dna(&[0x00]), "AAAA");
        assert_eq!(bytes_to_dna(&[0xff]), "TTTT");
        assert_eq!(bytes_to_dna(&[0x1b]), "AGCT");
        assert_eq!(dna_to_bytes("AGCT").unwrap(), vec![0x1b]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            dna_to_bytes("AGC"),
            Err(CodecError::InvalidLength { len: 3, multiple: 4 })
        ));
        assert!(matches!(
            dna_to_bytes("AGCX"),
            Err(CodecError::InvalidBase('X'))
        ));
    }

    #[test]
    fn test_complement_is_involution() {
        let dna = "ATGCCGTA";
        let c = complement(dna).unwrap();
        assert_eq!(c, "TACGGCAT");
        assert_eq!(complement(&c).unwrap(), dna);
    }

    #[test]
    fn test_merge_split_bases() {
        let values = vec![1u8, 2, 3, 0, 1, 2, 3];
        let merged = merge_bases(&values, 7);
        assert_eq!(merged.len(), 1);
        assert_eq!(split_bases(&merged, 7), values);

        // dernier symbole complété par des zéros en poids faible
        let merged = merge_bases(&values, 4);
        assert_eq!(merged.len(), 2);
        let back = split_bases(&merged, 4);
        assert_eq!(&back[..7], &values[..]);
        assert_eq!(back[7], 0);
    }

    #[test]
    fn test_strip_segment() {
        assert_eq!(strip_segment(" ATGC;\r"), "ATGC");
        assert_eq!(strip_segment("\"ATGC\""), "ATGC");
        assert_eq!(strip_segment(""), "");
    }

    proptest! {
        #[test]
        fn prop_bytes_dna_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let dna = bytes_to_dna(&data);
            prop_assert_eq!(dna_to_bytes(&dna).unwrap(), data);
        }

        #[test]
        fn prop_dna_bytes_roundtrip(values in proptest::collection::vec(0u8..4, 0..64)) {
            let values: Vec<u8> = values.chunks_exact(4).flatten().copied().collect();
            let dna = values_to_dna(&values);
            let bytes = dna_to_bytes(&dna).unwrap();
            prop_assert_eq!(bytes_to_dna(&bytes), dna);
        }

        #[test]
        fn prop_merge_split(values in proptest::collection::vec(0u8..4, 1..128), bs in 1usize..8) {
            let merged = merge_bases(&values, bs);
            let back = split_bases(&merged, bs);
            prop_assert_eq!(&back[..values.len()], &values[..]);
            prop_assert!(back[values.len()..].iter().all(|&v| v == 0));
        }
    }
}
