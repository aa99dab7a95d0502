//! Paramètres d'une session d'encodage/décodage
//!
//! Le jeu de paramètres est immuable pour la durée d'une session et passé par
//! valeur au codec. Les dimensions dérivées (en bases ADN) découlent de la
//! règle « une base = 2 bits ».

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Paramètres du codec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecParams {
    /// Identifiant du paquet d'information; pilote la dérivation du primer
    pub package_id: Option<String>,
    /// Longueur du primer en octets (0 désactive le primer)
    pub primer_length: usize,
    /// Largeur des symboles du code interne en bits
    pub mi: usize,
    /// Largeur des symboles du code externe en bits
    pub mo: usize,
    /// Longueur totale de l'index en bits
    pub index_length: usize,
    /// Longueur de la numérotation des segments en bits (section I1)
    pub index_positions: usize,
    /// Longueur du mot de code interne en symboles
    pub n: usize,
    /// Longueur du message interne en symboles
    pub k: usize,
    /// Redondance externe visée, dans (0, 1)
    pub target_redundancy: f64,
    /// Encapsulation ZIP de la charge utile avant encodage
    pub auto_zip: bool,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            package_id: None,
            primer_length: 5,
            mi: 8,
            mo: 14,
            index_length: 32,
            index_positions: 24,
            n: 34,
            k: 30,
            target_redundancy: 0.4,
            auto_zip: true,
        }
    }
}

impl CodecParams {
    /// Paramètres par défaut avec un identifiant de paquet
    pub fn with_package_id(package_id: impl Into<String>) -> Self {
        Self {
            package_id: Some(package_id.into()),
            ..Self::default()
        }
    }

    /// Bases par symbole interne
    pub fn dmi(&self) -> usize {
        self.mi / 2
    }

    /// Bases par symbole externe
    pub fn dmo(&self) -> usize {
        self.mo / 2
    }

    /// Longueur de l'index en bases
    pub fn di(&self) -> usize {
        self.index_length / 2
    }

    /// Longueur de la numérotation I1 en bases
    pub fn di1(&self) -> usize {
        self.index_positions / 2
    }

    /// Longueur des comptes à rebours I2 en bases
    pub fn di2(&self) -> usize {
        self.di() - self.di1()
    }

    /// Numérotation I1 en octets
    pub fn index_bytes(&self) -> usize {
        self.index_positions / 8
    }

    /// Message interne en bases
    pub fn dk(&self) -> usize {
        self.k * self.dmi()
    }

    /// Longueur d'un segment en bases, primer exclu
    pub fn dn(&self) -> usize {
        self.n * self.dmi()
    }

    /// Symboles de parité du code interne
    pub fn necsi(&self) -> usize {
        self.n - self.k
    }

    /// Parité interne en bases (lignes réservées en tête de colonne)
    pub fn dnecsi(&self) -> usize {
        self.necsi() * self.dmi()
    }

    /// Lignes de message par colonne
    pub fn message_rows(&self) -> usize {
        self.dk() - self.di()
    }

    /// Longueur du mot de code externe en symboles: 2^mo − 1
    pub fn outer_n(&self) -> usize {
        (1 << self.mo) - 1
    }

    /// Vérifie la cohérence du jeu de paramètres
    pub fn validate(&self) -> Result<()> {
        if self.mi % 2 != 0 || self.mo % 2 != 0 {
            return Err(CodecError::Internal(
                "mi et mo doivent être pairs (bases de 2 bits)".into(),
            ));
        }
        if !(8..=14).contains(&self.mi) || !(8..=14).contains(&self.mo) {
            return Err(CodecError::Internal(format!(
                "largeurs de symboles hors plage: mi={} mo={}",
                self.mi, self.mo
            )));
        }
        if self.k == 0 || self.n <= self.k {
            return Err(CodecError::Internal(format!(
                "code interne invalide: N={} K={}",
                self.n, self.k
            )));
        }
        if self.n > (1 << self.mi) - 1 {
            return Err(CodecError::Internal(format!(
                "mot de code interne trop long: N={} pour mi={}",
                self.n, self.mi
            )));
        }
        if self.index_length % self.mi != 0 || self.index_positions % 8 != 0 {
            return Err(CodecError::Internal(
                "longueurs d'index non alignées sur les symboles".into(),
            ));
        }
        if self.index_positions >= self.index_length {
            return Err(CodecError::Internal(
                "index_positions doit être strictement inférieur à index_length".into(),
            ));
        }
        if self.di2() * 2 < 8 {
            return Err(CodecError::Internal(
                "la section I2 doit contenir au moins un octet".into(),
            ));
        }
        if self.primer_length > 32 {
            return Err(CodecError::Internal(format!(
                "primer de {} octets: le condensé SHA-256 n'en fournit que 32",
                self.primer_length
            )));
        }
        if !(self.target_redundancy > 0.0 && self.target_redundancy < 1.0) {
            return Err(CodecError::Internal(format!(
                "redondance visée hors de (0,1): {}",
                self.target_redundancy
            )));
        }
        if self.message_rows() == 0 {
            return Err(CodecError::Internal(
                "l'index occupe tout le message interne".into(),
            ));
        }
        Ok(())
    }
}
