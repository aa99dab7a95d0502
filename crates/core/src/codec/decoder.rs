//! Décodage d'un pool de segments ADN vers la charge utile
//!
//! Pipeline: retrait des primers → layout (colonnes ramenées à la taille
//! médiane) → décodage interne par segment → récupération de l'index et des
//! paramètres de blocs par vote des comptes à rebours → matérialisation des
//! segments perdus en colonnes nulles → décodage externe avec effacements →
//! réassemblage des octets, démasquage, extraction du conteneur.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

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

/// Décodeur d'un paquet d'information
pub struct Decoder {
    params: CodecParams,
    primer: Option<Primer>,
    stats: CodecStats,
}

/// Index récupéré d'une colonne: numéro de segment et compte à rebours
struct RecoveredIndex {
    number: usize,
    countdown: usize,
}

impl Decoder {
    /// Crée un décodeur pour le jeu de paramètres donné
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

    /// Décode un texte ADN (un segment par ligne) en charge utile
    pub fn decode(&mut self, text: &str) -> Result<Vec<u8>> {
        self.stats = CodecStats::default();

        let segments = self.parse_segments(text);
        if segments.is_empty() {
            return Err(CodecError::ParameterRecovery(
                "aucun segment ADN exploitable".into(),
            ));
        }
        let sizes: Vec<usize> = segments.iter().map(|s| s.len()).collect();
        self.stats.segments = SegmentStats::from_sizes(&sizes);
        let median = self.stats.segments.size_median;

        let line_offset = self.params.dnecsi() + self.params.di();
        if median <= line_offset {
            return Err(CodecError::ParameterRecovery(format!(
                "segments trop courts ({median} bases) pour les zones de parité et d'index"
            )));
        }

        let mut layout = MemoryLayout::with_rows(median);
        for (i, cells) in segments.into_iter().enumerate() {
            layout.push_column(i, cells);
        }
        layout.reindex();

        self.decode_inner_code(&mut layout)?;
        let indices = self.recover_indices(&mut layout)?;
        let (geometry, filled) = self.recover_geometry(&mut layout, &indices)?;
        self.decode_outer_code(&mut layout, &geometry, &filled)?;
        let payload = self.emit_binary(&layout, &geometry)?;

        self.fill_stats(&geometry, payload.len());
        info!(
            bytes = payload.len(),
            lost = self.stats.corrections.segments_lost,
            beyond_repair = self.stats.corrections.segments_beyond_repair,
            "pool ADN décodé"
        );
        Ok(payload)
    }

    /// Découpe le texte en segments, retire les primers et rejette les
    /// lignes invalides
    fn parse_segments(&mut self, text: &str) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for line in text.lines() {
            let stripped = bases::strip_segment(line);
            if stripped.is_empty() {
                continue;
            }
            let inner = match &self.primer {
                Some(primer) => match primer.strip(stripped) {
                    Ok(inner) => inner,
                    Err(_) => {
                        warn!("segment rejeté: primer non reconnu");
                        self.stats.corrections.segments_beyond_repair += 1;
                        continue;
                    }
                },
                None => stripped,
            };
            match bases::dna_to_values(inner) {
                Ok(cells) => out.push(cells),
                Err(_) => {
                    warn!("segment rejeté: caractère hors alphabet ADN");
                    self.stats.corrections.segments_beyond_repair += 1;
                }
            }
        }
        out
    }

    /// Décodage interne colonne par colonne; les segments incorrigibles sont
    /// détruits (ils reviendront comme effacements pour le code externe)
    fn decode_inner_code(&mut self, layout: &mut MemoryLayout) -> Result<()> {
        let coder = ReedSolomon::new(GfField::new(self.params.mi)?, self.params.necsi())?;
        let dmi = self.params.dmi();
        let dnecsi = self.params.dnecsi();

        let mut destroyed: Vec<usize> = Vec::new();
        for key in 0..layout.num_columns() {
            let column = layout.get_column(key)?;
            let mut codeword = bases::merge_bases(&column[dnecsi..], dmi);
            codeword.extend(bases::merge_bases(&column[..dnecsi], dmi));

            match coder.decode(&codeword, &[]) {
                Ok((_, 0)) => {}
                Ok((decoded, ncorr)) => {
                    self.stats.corrections.inner += ncorr;
                    let message_cells = layout.num_rows() - dnecsi;
                    let repaired = bases::split_bases(&decoded, dmi);
                    for (j, &value) in repaired.iter().take(message_cells).enumerate() {
                        layout.set_pos(dnecsi + j, key, value)?;
                    }
                }
                Err(CodecError::Uncorrectable(_)) => {
                    self.stats.corrections.segments_beyond_repair += 1;
                    destroyed.push(key);
                }
                Err(e) => return Err(e),
            }
        }
        if !destroyed.is_empty() {
            debug!(count = destroyed.len(), "segments détruits au décodage interne");
        }
        for &key in destroyed.iter().rev() {
            layout.pop_column(key)?;
        }
        Ok(())
    }

    /// Démasque la zone d'index de chaque colonne et lui réaffecte son
    /// numéro de segment
    fn recover_indices(&self, layout: &mut MemoryLayout) -> Result<Vec<RecoveredIndex>> {
        let dnecsi = self.params.dnecsi();
        let di = self.params.di();
        let di1 = self.params.di1();
        let index_bytes = self.params.index_bytes();

        let mut indices = Vec::with_capacity(layout.num_columns());
        for pos in 0..layout.num_columns() {
            let (_, cells) = layout.column_by_position(pos);
            let unmasked: Vec<u8> = (0..di)
                .map(|j| mask::mask_base(cells[dnecsi + j], j))
                .collect();

            let mut number = 0usize;
            for j in 0..index_bytes {
                number = (number << 8) | usize::from(bases::bases_to_byte(&unmasked[4 * j..4 * j + 4]));
            }
            let countdown = usize::from(bases::bases_to_byte(&unmasked[di1..di1 + 4]));

            layout.renumber(pos, number);
            indices.push(RecoveredIndex { number, countdown });
        }
        layout.reindex();
        Ok(indices)
    }

    /// Retrouve la géométrie des blocs par vote des comptes à rebours, puis
    /// matérialise les segments manquants en colonnes nulles
    ///
    /// Chaque compte à rebours non nul désigne une frontière de zone
    /// (`numéro + compte + 1`). Les frontières confirmées par au moins deux
    /// colonnes sont retenues: la plus petite donne la fin de la parité
    /// externe du premier bloc, la suivante la taille de bloc, la plus
    /// grande la fin du pool. Un vote isolé peut provenir d'un index
    /// mal corrigé; il n'est utilisé qu'à défaut de frontière confirmée.
    fn recover_geometry(
        &mut self,
        layout: &mut MemoryLayout,
        indices: &[RecoveredIndex],
    ) -> Result<(BlockGeometry, HashSet<usize>)> {
        let mut votes: HashMap<usize, usize> = HashMap::new();
        for idx in indices {
            if idx.countdown != 0 {
                *votes.entry(idx.number + idx.countdown + 1).or_insert(0) += 1;
            }
        }
        if votes.is_empty() {
            return Err(CodecError::ParameterRecovery(
                "aucun compte à rebours non nul dans le pool".into(),
            ));
        }
        let mut trusted: Vec<usize> = votes
            .iter()
            .filter(|&(_, &count)| count >= 2)
            .map(|(&boundary, _)| boundary)
            .collect();
        if trusted.is_empty() {
            trusted = votes.keys().copied().collect();
        }
        trusted.sort_unstable();

        let dnecso = trusted[0];
        let dblocksize = trusted
            .iter()
            .copied()
            .find(|&b| b > dnecso)
            .unwrap_or_else(|| layout.num_columns().max(dnecso + 1));
        let last_index = trusted[trusted.len() - 1] - 1;
        debug!(dnecso, dblocksize, last_index, "géométrie récupérée");

        // colonnes au numéro aberrant ou déjà vu: détruites
        let mut seen: HashSet<usize> = HashSet::new();
        let mut dropped: Vec<usize> = Vec::new();
        for pos in 0..layout.num_columns() {
            let (key, _) = layout.column_by_position(pos);
            if key > last_index + dblocksize || !seen.insert(key) {
                dropped.push(pos);
            }
        }
        for &pos in dropped.iter().rev() {
            warn!(pos, "colonne écartée: numéro de segment invraisemblable ou dupliqué");
            self.stats.corrections.segments_beyond_repair += 1;
            layout.pop_position(pos);
        }
        layout.reindex();

        // matérialisation des segments manquants
        let present: HashSet<usize> = layout.column_keys().into_iter().collect();
        let top = present.iter().copied().max().unwrap_or(0).max(last_index);
        let mut filled: HashSet<usize> = HashSet::new();
        for key in 0..=top {
            if !present.contains(&key) {
                layout.add_column(key);
                filled.insert(key);
            }
        }
        self.stats.corrections.segments_lost = filled.len();
        layout.reindex();

        let geometry =
            BlockGeometry::from_recovered(&self.params, dnecso, dblocksize, layout.num_columns())?;
        Ok((geometry, filled))
    }

    /// Décodage externe bloc par bloc, ligne par ligne; les colonnes
    /// matérialisées sont passées en effacements au codec Reed-Solomon
    fn decode_outer_code(
        &mut self,
        layout: &mut MemoryLayout,
        geometry: &BlockGeometry,
        filled: &HashSet<usize>,
    ) -> Result<()> {
        let coder = ReedSolomon::new(GfField::new(self.params.mo)?, geometry.necso)?;
        let dmo = self.params.dmo();
        let line_offset = self.params.dnecsi() + self.params.di();
        let message_rows = layout.num_rows() - line_offset;
        let all_keys = layout.column_keys();

        for blk in 0..geometry.numblocks {
            let range = geometry.block_range(blk, layout.num_columns());
            let block_keys: Vec<usize> = all_keys
                .iter()
                .copied()
                .filter(|k| range.contains(k))
                .collect();
            if block_keys.len() <= geometry.dnecso {
                self.stats.error = true;
                self.stats
                    .error_message
                    .push_str(&format!("bloc {blk} plus court que sa zone de parité\n"));
                continue;
            }

            let message_symbols = (block_keys.len() - geometry.dnecso).div_ceil(dmo);
            let mut erasures: Vec<usize> = block_keys
                .iter()
                .enumerate()
                .filter(|(_, k)| filled.contains(k))
                .map(|(pos, _)| {
                    if pos < geometry.dnecso {
                        message_symbols + pos / dmo
                    } else {
                        (pos - geometry.dnecso) / dmo
                    }
                })
                .collect();
            erasures.sort_unstable();
            erasures.dedup();

            for i in 0..message_rows {
                let row = i + line_offset;
                let line = layout.get_line(row, range.clone());
                let mut codeword = bases::merge_bases(&line[geometry.dnecso..], dmo);
                codeword.extend(bases::merge_bases(&line[..geometry.dnecso], dmo));

                match coder.decode(&codeword, &erasures) {
                    Ok((_, 0)) => {}
                    Ok((decoded, ncorr)) => {
                        self.stats.corrections.outer += ncorr;
                        let repaired = bases::split_bases(&decoded, dmo);
                        let scope = repaired.len().min(line.len() - geometry.dnecso);
                        for (j, &value) in repaired.iter().take(scope).enumerate() {
                            layout.set_pos(row, range.start + geometry.dnecso + j, value)?;
                        }
                    }
                    Err(CodecError::Uncorrectable(e)) => {
                        self.stats.error = true;
                        self.stats
                            .error_message
                            .push_str(&format!("bloc {blk}, ligne {i}: {e}\n"));
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    /// Réassemble les octets depuis les colonnes de message, démasque et
    /// extrait le conteneur le cas échéant
    fn emit_binary(&self, layout: &MemoryLayout, geometry: &BlockGeometry) -> Result<Vec<u8>> {
        let line_offset = self.params.dnecsi() + self.params.di();
        let keys = layout.column_keys();
        let mut cells: Vec<u8> = Vec::new();

        for blk in 0..geometry.numblocks {
            let start = blk * geometry.dblocksize + geometry.dnecso;
            let stop = ((blk + 1) * geometry.dblocksize).min(keys.len());
            if start >= stop {
                continue;
            }
            for &key in &keys[start..stop] {
                cells.extend_from_slice(&layout.get_column(key)?[line_offset..]);
            }
        }

        let packed: Vec<u8> = cells.chunks_exact(4).map(bases::bases_to_byte).collect();
        let unmasked = mask::mask_bytes(&packed);

        if self.params.auto_zip {
            archive::unwrap_payload(&unmasked)
        } else {
            Ok(unmasked)
        }
    }

    fn fill_stats(&mut self, geometry: &BlockGeometry, payload_len: usize) {
        let p = &self.params;
        self.stats.binary_size = payload_len;
        self.stats.redundancy.inner = (p.n - p.k) as f64 / p.n as f64;
        self.stats.redundancy.outer =
            geometry.dnecso as f64 / self.stats.segments.count.max(1) as f64;
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
    use crate::codec::encoder::Encoder;

    fn raw_params() -> CodecParams {
        CodecParams {
            auto_zip: false,
            primer_length: 0,
            ..CodecParams::default()
        }
    }

    #[test]
    fn test_clean_roundtrip_prefix() {
        // sans conteneur, le décodage rend la charge utile suivie du
        // bourrage démasqué de la dernière colonne
        let payload: Vec<u8> = (0..1000).map(|i| (i * 31 % 256) as u8).collect();
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let text = encoder.encode_to_text(&payload).unwrap();

        let mut decoder = Decoder::new(raw_params()).unwrap();
        let decoded = decoder.decode(&text).unwrap();
        assert!(decoded.len() >= payload.len());
        assert_eq!(&decoded[..payload.len()], &payload[..]);
        assert_eq!(decoder.stats().corrections.inner, 0);
        assert!(!decoder.stats().error);
    }

    #[test]
    fn test_empty_pool_is_fatal() {
        let mut decoder = Decoder::new(raw_params()).unwrap();
        assert!(matches!(
            decoder.decode("\n\n  \n"),
            Err(CodecError::ParameterRecovery(_))
        ));
    }

    #[test]
    fn test_punctuation_and_blank_lines_ignored() {
        let payload = vec![7u8; 300];
        let mut encoder = Encoder::new(raw_params()).unwrap();
        let segments = encoder.encode(&payload).unwrap();
        let text: String = segments
            .iter()
            .map(|s| format!("  {s};\r\n\n"))
            .collect();

        let mut decoder = Decoder::new(raw_params()).unwrap();
        let decoded = decoder.decode(&text).unwrap();
        assert_eq!(&decoded[..payload.len()], &payload[..]);
    }
}
