//! Statistiques d'une session d'encodage ou de décodage

use serde::{Deserialize, Serialize};

/// Redondances effectives du codage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedundancyStats {
    /// Part de parité du code interne: (N−K)/N
    pub inner: f64,
    /// Colonnes de parité externes rapportées au nombre de segments
    pub outer: f64,
    /// Densité d'information en bits par base
    pub information_density: f64,
}

/// Tailles des segments ADN manipulés
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentStats {
    pub count: usize,
    pub size_min: usize,
    pub size_max: usize,
    pub size_median: usize,
    pub size_average: f64,
}

/// Compteurs de corrections appliquées au décodage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionStats {
    /// Symboles corrigés par le code interne
    pub inner: usize,
    /// Symboles corrigés par le code externe (effacements compris)
    pub outer: usize,
    /// Segments irrécupérables, détruits avant le code externe
    pub segments_beyond_repair: usize,
    /// Segments absents, recréés à zéro pour le code externe
    pub segments_lost: usize,
}

/// Paramètres effectifs de la session, tels qu'utilisés ou récupérés
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub mi: usize,
    pub mo: usize,
    pub n: usize,
    pub k: usize,
    pub necsi: usize,
    pub outer_n: usize,
    pub necso: usize,
    pub numblocks: usize,
    pub dblocksize: usize,
    pub index_length: usize,
    pub index_positions: usize,
    pub package_id: Option<String>,
    pub primer: Option<String>,
}

/// Statistiques complètes d'une session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecStats {
    pub redundancy: RedundancyStats,
    pub segments: SegmentStats,
    /// Taille de la charge utile en octets
    pub binary_size: usize,
    pub corrections: CorrectionStats,
    /// Le code externe a-t-il rencontré des lignes incorrigibles
    pub error: bool,
    pub error_message: String,
    pub parameters: ParameterSummary,
}

impl SegmentStats {
    /// Calcule les statistiques de tailles d'une liste de segments
    pub fn from_sizes(sizes: &[usize]) -> Self {
        if sizes.is_empty() {
            return Self::default();
        }
        let mut sorted = sizes.to_vec();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2
        };
        Self {
            count: sorted.len(),
            size_min: sorted[0],
            size_max: *sorted.last().unwrap(),
            size_median: median,
            size_average: sorted.iter().sum::<usize>() as f64 / sorted.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_odd() {
        let s = SegmentStats::from_sizes(&[5, 3, 9]);
        assert_eq!(s.count, 3);
        assert_eq!(s.size_min, 3);
        assert_eq!(s.size_max, 9);
        assert_eq!(s.size_median, 5);
    }

    #[test]
    fn test_sizes_even_median_truncates() {
        let s = SegmentStats::from_sizes(&[4, 7, 10, 5]);
        assert_eq!(s.size_median, 6);
        assert!((s.size_average - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sizes() {
        let s = SegmentStats::from_sizes(&[]);
        assert_eq!(s.count, 0);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CodecStats::default();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("segments_lost"));
    }
}
