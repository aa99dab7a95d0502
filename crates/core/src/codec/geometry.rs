//! Géométrie des blocs du code externe
//!
//! L'espace des colonnes est découpé en `numblocks` blocs contigus de
//! `dblocksize` colonnes: `dnecso` colonnes de parité suivies des colonnes de
//! message. Un mot de code externe couvre une ligne d'un bloc. Les segments
//! sont répartis équitablement entre blocs pour éviter un dernier bloc
//! minuscule; seul le dernier bloc peut être plus court.

use std::ops::Range;

use crate::error::{CodecError, Result};
use crate::params::CodecParams;

/// Dimensions des blocs pour une session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGeometry {
    /// Colonnes de message
    pub dk: usize,
    /// Colonnes de parité externe par bloc
    pub dnecso: usize,
    /// Symboles de parité externe par mot de code
    pub necso: usize,
    /// Nombre de blocs
    pub numblocks: usize,
    /// Largeur d'un bloc en colonnes
    pub dblocksize: usize,
    /// Nombre total de colonnes
    pub dn: usize,
}

impl BlockGeometry {
    /// Calcule la géométrie pour `dk` colonnes de message
    ///
    /// La parité est dimensionnée d'après la redondance visée `r`:
    /// `dnecso = (floor(r/(1−r) · min(dk, n·dmo)) / dmo + 1) · dmo`,
    /// arrondie strictement au multiple de `dmo` supérieur.
    pub fn for_message_columns(params: &CodecParams, dk: usize) -> Result<Self> {
        let dmo = params.dmo();
        let block_capacity = params.outer_n() * dmo;

        let dnk = dk.min(block_capacity);
        let r = params.target_redundancy;
        let raw = (r / (1.0 - r) * dnk as f64) as usize;
        let dnecso = (raw / dmo + 1) * dmo;
        if dnecso >= block_capacity {
            return Err(CodecError::Internal(format!(
                "redondance visée {r} trop élevée pour mo={}",
                params.mo
            )));
        }
        let necso = dnecso / dmo;

        // les segments sont répartis équitablement: numblocks couvre dk au
        // plafond, et chaque bloc reçoit assez de symboles pour sa part
        let numblocks = dk.div_ceil(block_capacity - dnecso);
        let per_block_symbols = dk.div_ceil(numblocks * dmo);
        let dblocksize = per_block_symbols * dmo + dnecso;

        Ok(Self {
            dk,
            dnecso,
            necso,
            numblocks,
            dblocksize,
            dn: dk + dnecso * numblocks,
        })
    }

    /// Reconstruit la géométrie depuis les valeurs récupérées au décodage
    pub fn from_recovered(
        params: &CodecParams,
        dnecso: usize,
        dblocksize: usize,
        total_columns: usize,
    ) -> Result<Self> {
        let dmo = params.dmo();
        let necso = dnecso / dmo;
        if necso == 0 || necso >= params.outer_n() {
            return Err(CodecError::ParameterRecovery(format!(
                "parité externe récupérée incohérente: dnecso={dnecso}"
            )));
        }
        if dblocksize <= dnecso {
            return Err(CodecError::ParameterRecovery(format!(
                "taille de bloc récupérée incohérente: {dblocksize}"
            )));
        }
        if dblocksize.div_ceil(dmo) > params.outer_n() {
            return Err(CodecError::ParameterRecovery(format!(
                "bloc récupéré de {dblocksize} colonnes: le mot de code externe déborde du corps"
            )));
        }
        let numblocks = total_columns.div_ceil(dblocksize);
        Ok(Self {
            dk: total_columns.saturating_sub(dnecso * numblocks),
            dnecso,
            necso,
            numblocks,
            dblocksize,
            dn: total_columns,
        })
    }

    /// Clés couvertes par un bloc, bornées au nombre de colonnes
    pub fn block_range(&self, blk: usize, total_columns: usize) -> Range<usize> {
        let start = blk * self.dblocksize;
        let stop = ((blk + 1) * self.dblocksize).min(total_columns);
        start..stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block_geometry() {
        // 77 colonnes de message avec les paramètres par défaut
        let p = CodecParams::default();
        let g = BlockGeometry::for_message_columns(&p, 77).unwrap();
        assert_eq!(g.dnecso, 56);
        assert_eq!(g.necso, 8);
        assert_eq!(g.numblocks, 1);
        assert_eq!(g.dblocksize, 133);
        assert_eq!(g.dn, 133);
    }

    #[test]
    fn test_multi_block_geometry_mo8() {
        let p = CodecParams {
            mo: 8,
            ..CodecParams::default()
        };
        let g = BlockGeometry::for_message_columns(&p, 2521).unwrap();
        assert_eq!(g.dnecso, 684);
        assert_eq!(g.necso, 171);
        assert_eq!(g.numblocks, 8);
        assert_eq!(g.dblocksize, 1000);
        assert_eq!(g.dn, 2521 + 684 * 8);
        // la capacité d'un mot de code externe est respectée
        assert!(g.dblocksize / p.dmo() <= p.outer_n());
    }

    #[test]
    fn test_block_range_clamps_last_block() {
        let p = CodecParams::default();
        let g = BlockGeometry::for_message_columns(&p, 2521).unwrap();
        assert_eq!(g.numblocks, 1);
        let range = g.block_range(0, g.dn);
        assert_eq!(range.start, 0);
        assert_eq!(range.end, g.dn);
        assert!(g.dn < g.dblocksize);
    }

    #[test]
    fn test_excessive_redundancy_rejected() {
        let p = CodecParams {
            target_redundancy: 0.995,
            ..CodecParams::default()
        };
        assert!(BlockGeometry::for_message_columns(&p, 100_000_000).is_err());
    }

    #[test]
    fn test_recovered_geometry() {
        let p = CodecParams::default();
        let g = BlockGeometry::from_recovered(&p, 56, 133, 133).unwrap();
        assert_eq!(g.necso, 8);
        assert_eq!(g.numblocks, 1);
        assert!(BlockGeometry::from_recovered(&p, 3, 133, 133).is_err());
        assert!(BlockGeometry::from_recovered(&p, 56, 40, 133).is_err());
    }
}
