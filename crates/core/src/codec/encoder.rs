//! Encodage d'une charge utile binaire en segments ADN
//!
//! Pipeline: conteneur ZIP (optionnel) → masque XOR → éclatement en bases →
//! chargement du layout → code externe (entre segments, ligne par ligne) →
//! index auto-descriptif → code interne (par segment) → chaînes ADN, avec
//! primer en option.

use tracing::{debug, info};

use crate::archive;
use crate::bases;
use crate::codec::geometry::BlockGeometry;
use crate::error::{CodecError, Result};
use crate::gf::GfField;
use crate::layout::MemoryLayout;
use crate::mask;
use crate::params::CodecParams;
use crate::primer::Primer;
use crate::rs::ReedSolomon;
use crate::stats::{CodecStats, SegmentStats};

/// Encodeur d'un paquet d'information
pub struct Encoder {
    params: CodecParams,
    primer: Option<Primer>,
    stats: CodecStats,
}

impl Encoder {
    /// Crée un encodeur pour le jeu de paramètres donné
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        let primer = match (&params.package_id, params.primer_length) {
            (Some(id), len) if len > 0 => Some(Primer::from_package_id(id, len)?),
            _ => None,
        };
        Ok(Self {
            params,
            primer,
            stats: CodecStats::default(),
        })
    }

    /// Statistiques de la dernière session
    pub fn stats(&self) -> &CodecStats {
        &self.stats
    }

    /// Encode la charge utile en segments ADN, un par colonne du layout
    pub fn encode(&mut self, payload: &[u8]) -> Result<Vec<String>> {
        self.stats = CodecStats::default();
        self.stats.binary_size = payload.len();

        let data = if self.params.auto_zip {
            archive::wrap_payload(payload)?
        } else {
            payload.to_vec()
        };
        let masked = mask::mask_bytes(&data);
        let cells: Vec<u8> = masked.iter().flat_map(|&b| bases::byte_to_bases(b)).collect();

        let message_rows = self.params.message_rows();
        let dk = cells.len().div_ceil(message_rows).max(1);
        let geometry = BlockGeometry::for_message_columns(&self.params, dk)?;
        if geometry.dn > 1usize << self.params.index_positions {
            return Err(CodecError::Internal(format!(
                "{} segments ne tiennent pas dans un index de {} bits",
                geometry.dn, self.params.index_positions
            )));
        }
        debug!(
            dk,
            dnecso = geometry.dnecso,
            numblocks = geometry.numblocks,
            dblocksize = geometry.dblocksize,
            "géométrie des blocs"
        );

        let mut layout = self.load_layout(&cells, &geometry)?;
        self.add_outer_code(&mut layout, &geometry)?;
        self.add_index(&mut layout, &geometry)?;
        self.add_inner_code(&mut layout)?;

        let segments = self.emit_dna(&layout)?;
        self.fill_stats(&segments, &geometry);
        info!(
            segments = segments.len(),
            bytes = payload.len(),
            "charge utile encodée"
        );
        Ok(segments)
    }

    /// Encode et sérialise en texte, un segment par ligne
    pub fn encode_to_text(&mut self, payload: &[u8]) -> Result<String> {
        Ok(self.encode(payload)?.join("\n"))
    }

    /// Charge les bases de message dans le layout et réserve les zones de
    /// parité: lignes internes et d'index en tête, colonnes externes en tête
    /// de chaque bloc
    fn load_layout(&self, cells: &[u8], geometry: &BlockGeometry) -> Result<MemoryLayout> {
        let message_rows = self.params.message_rows();
        let mut layout = MemoryLayout::new(message_rows, geometry.dk);

        // remplissage colonne par colonne, la dernière complétée de zéros
        for (i, &value) in cells.iter().enumerate() {
            let column = i / message_rows;
            let row = i % message_rows;
            layout.set_pos(row, column, value)?;
        }

        let delta = self.params.dn() - message_rows;
        layout.insert_lines(0, delta);
        for blk in 0..geometry.numblocks {
            layout.insert_columns(blk * geometry.dblocksize, geometry.dnecso);
        }
        Ok(layout)
    }

    /// Code externe: pour chaque ligne de message de chaque bloc, les
    /// symboles de parité sont calculés sur la ligne et rangés dans les
    /// colonnes réservées du bloc
    fn add_outer_code(&self, layout: &mut MemoryLayout, geometry: &BlockGeometry) -> Result<()> {
        let coder = ReedSolomon::new(GfField::new(self.params.mo)?, geometry.necso)?;
        let dmo = self.params.dmo();
        let line_offset = self.params.dnecsi() + self.params.di();

        for blk in 0..geometry.numblocks {
            let range = geometry.block_range(blk, layout.num_columns());
            for i in 0..self.params.message_rows() {
                let line = layout.get_line(i + line_offset, range.clone());
                let message = bases::merge_bases(&line[geometry.dnecso..], dmo);
                let codeword = coder.encode(&message)?;
                let parity = &codeword[codeword.len() - geometry.necso..];
                for (j, &value) in bases::split_bases(parity, dmo).iter().enumerate() {
                    layout.set_pos(i + line_offset, range.start + j, value)?;
                }
            }
        }
        Ok(())
    }

    /// Index auto-descriptif: numéro de segment dans I1, comptes à rebours
    /// de fin de parité et de fin de bloc dans I2, le tout masqué
    fn add_index(&self, layout: &mut MemoryLayout, geometry: &BlockGeometry) -> Result<()> {
        let dnecsi = self.params.dnecsi();
        let di1 = self.params.di1();
        let index_bytes = self.params.index_bytes();
        let total = layout.num_columns();

        // numérotation des segments, gros-boutiste sur I1
        for key in 0..total {
            for j in 0..index_bytes {
                let byte = ((key >> (8 * (index_bytes - 1 - j))) & 0xff) as u8;
                for (l, value) in bases::byte_to_bases(byte).into_iter().enumerate() {
                    layout.set_pos(dnecsi + 4 * j + l, key, value)?;
                }
            }
        }

        for blk in 0..geometry.numblocks {
            let block_start = blk * geometry.dblocksize;
            let block_len = if blk < geometry.numblocks - 1 {
                geometry.dblocksize
            } else if total > block_start {
                total - block_start
            } else {
                total
            };

            // compte à rebours vers la fin du bloc, 0 au-delà d'un octet
            for i in 0..block_len {
                let countdown = if i + 256 < block_len {
                    0
                } else {
                    (block_len - i - 1) as u8
                };
                for (l, value) in bases::byte_to_bases(countdown).into_iter().enumerate() {
                    layout.set_pos(dnecsi + di1 + l, block_start + i, value)?;
                }
            }

            // compte à rebours vers la fin de la parité externe, par-dessus
            for i in 0..geometry.dnecso {
                if i + 256 >= geometry.dnecso {
                    let countdown = (geometry.dnecso - i - 1) as u8;
                    for (l, value) in bases::byte_to_bases(countdown).into_iter().enumerate() {
                        layout.set_pos(dnecsi + di1 + l, block_start + i, value)?;
                    }
                }
            }
        }

        // blanchiment de la zone d'index
        for key in 0..total {
            for j in 0..self.params.di() {
                let value = layout.get_pos(dnecsi + j, key)?;
                layout.set_pos(dnecsi + j, key, mask::mask_base(value, j))?;
            }
        }
        Ok(())
    }

    /// Code interne: chaque colonne reçoit ses symboles de parité dans les
    /// lignes réservées en tête
    fn add_inner_code(&self, layout: &mut MemoryLayout) -> Result<()> {
        let coder = ReedSolomon::new(GfField::new(self.params.mi)?, self.params.necsi())?;
        let dmi = self.params.dmi();
        let dnecsi = self.params.dnecsi();

        for key in 0..layout.num_columns() {
            let message = bases::merge_bases(&layout.get_column(key)?[dnecsi..], dmi);
            let codeword = coder.encode(&message)?;
            let parity = &codeword[codeword.len() - self.params.necsi()..];
            for (j, &value) in bases::split_bases(parity, dmi).iter().enumerate() {
                layout.set_pos(j, key, value)?;
            }
        }
        Ok(())
    }

    /// Convertit les colonnes en chaînes ADN, primer compris
    fn emit_dna(&self, layout: &MemoryLayout) -> Result<Vec<String>> {
        let mut segments = Vec::with_capacity(layout.num_columns());
        for key in layout.column_keys() {
            let dna = bases::values_to_dna(layout.get_column(key)?);
            segments.push(match &self.primer {
                Some(primer) => primer.wrap(&dna),
                None => dna,
            });
        }
        Ok(segments)
    }

    fn fill_stats(&mut self, segments: &[String], geometry: &BlockGeometry) {
        let sizes: Vec<usize> = segments.iter().map(|s| s.len()).collect();
        self.stats.segments = SegmentStats::from_sizes(&sizes);

        let p = &self.params;
        self.stats.redundancy.inner = (p.n - p.k) as f64 / p.n as f64;
        self.stats.redundancy.outer = geometry.dnecso as f64 / segments.len().max(1) as f64;
        self.stats.redundancy.information_density = 2.0 * (p.k as f64 / p.n as f64)
            * ((p.outer_n() - geometry.necso) as f64 / p.outer_n() as f64);

        self.stats.parameters.mi = p.mi;
        self.stats.parameters.mo = p.mo;
        self.stats.parameters.n = p.n;
        self.stats.parameters.k = p.k;
        self.stats.parameters.necsi = p.necsi();
        self.stats.parameters.outer_n = p.outer_n();
        self.stats.parameters.necso = geometry.necso;
        self.stats.parameters.numblocks = geometry.numblocks;
        self.stats.parameters.dblocksize = geometry.dblocksize;
        self.stats.parameters.index_length = p.index_length;
        self.stats.parameters.index_positions = p.index_positions;
        self.stats.parameters.package_id = p.package_id.clone();
        self.stats.parameters.primer = self.primer.as_ref().map(|pr| pr.sequence().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_params() -> CodecParams {
        CodecParams {
            auto_zip: false,
            primer_length: 0,
            ..CodecParams::default()
        }
    }

    #[test]
    fn test_encode_produces_uniform_segments() {
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let payload: Vec<u8> = (0..500).map(|i| (i % 256) as u8).collect();
        let segments = encoder.encode(&payload).unwrap();
        assert!(!segments.is_empty());
        for s in &segments {
            assert_eq!(s.len(), 136);
            assert!(bases::is_valid_dna(s));
        }
    }

    #[test]
    fn test_encode_with_primer_wraps_segments() {
        let params = CodecParams {
            auto_zip: false,
            ..CodecParams::with_package_id("aip:test")
        };
        let mut encoder = Encoder::new(params).unwrap();
        let segments = encoder.encode(&[1, 2, 3, 4]).unwrap();
        let primer = Primer::from_package_id("aip:test", 5).unwrap();
        for s in &segments {
            assert_eq!(s.len(), 176);
            assert!(s.starts_with(primer.sequence()));
        }
    }

    #[test]
    fn test_inner_code_verifies_clean() {
        // après encodage, le décodage interne de chaque segment passe sans
        // correction
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let payload: Vec<u8> = (0..300).map(|i| (i * 7 % 256) as u8).collect();
        let segments = encoder.encode(&payload).unwrap();

        let params = raw_params();
        let coder = ReedSolomon::new(GfField::new(params.mi).unwrap(), params.necsi()).unwrap();
        for s in &segments {
            let values = bases::dna_to_values(s).unwrap();
            let mut codeword = bases::merge_bases(&values[params.dnecsi()..], params.dmi());
            codeword.extend(bases::merge_bases(&values[..params.dnecsi()], params.dmi()));
            let (_, ncorr) = coder.decode(&codeword, &[]).unwrap();
            assert_eq!(ncorr, 0);
        }
    }

    #[test]
    fn test_empty_payload_encodes() {
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let segments = encoder.encode(&[]).unwrap();
        assert!(!segments.is_empty());
    }

    #[test]
    fn test_stats_filled() {
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let payload = vec![9u8; 1000];
        let segments = encoder.encode(&payload).unwrap();
        let stats = encoder.stats();
        assert_eq!(stats.segments.count, segments.len());
        assert_eq!(stats.binary_size, 1000);
        assert!(stats.redundancy.outer > 0.0);
        assert_eq!(stats.parameters.necsi, 4);
    }
}
