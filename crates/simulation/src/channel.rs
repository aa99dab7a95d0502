//! Canal de substitution de bases

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Bilan d'une passe de corruption
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorruptionReport {
    /// Segments touchés par au moins une substitution
    pub corrupted_segments: usize,
    /// Nombre total de segments du pool
    pub total_segments: usize,
    /// Bases substituées
    pub corrupted_bases: usize,
    /// Bases parcourues
    pub total_bases: usize,
}

/// Canal de substitution: chaque base bascule vers son complément avec la
/// probabilité `error_rate`
pub struct SubstitutionChannel {
    error_rate: f64,
    rng: ChaCha8Rng,
}

impl SubstitutionChannel {
    /// Crée un canal avec un taux d'erreur dans [0, 1] et une graine
    pub fn new(error_rate: f64, seed: u64) -> Self {
        Self {
            error_rate,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Canal semé sur l'entropie du système
    pub fn from_entropy(error_rate: f64) -> Self {
        Self {
            error_rate,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    fn flip(c: char) -> char {
        match c {
            'A' => 'T',
            'T' => 'A',
            'G' => 'C',
            'C' => 'G',
            other => other,
        }
    }

    /// Corrompt un segment, base par base
    pub fn corrupt_segment(&mut self, segment: &str) -> (String, usize) {
        let mut flipped = 0;
        let out = segment
            .chars()
            .map(|c| {
                if self.rng.gen_bool(self.error_rate) {
                    let f = Self::flip(c);
                    if f != c {
                        flipped += 1;
                    }
                    f
                } else {
                    c
                }
            })
            .collect();
        (out, flipped)
    }

    /// Corrompt un texte ADN complet, une ligne par segment
    pub fn corrupt_text(&mut self, text: &str) -> (String, CorruptionReport) {
        let mut report = CorruptionReport::default();
        let mut lines: Vec<String> = Vec::new();
        for line in text.split('\n') {
            report.total_segments += 1;
            report.total_bases += line.len();
            let (corrupted, flipped) = self.corrupt_segment(line);
            if flipped > 0 {
                report.corrupted_segments += 1;
                report.corrupted_bases += flipped;
            }
            lines.push(corrupted);
        }
        (lines.join("\n"), report)
    }
}
