//! Types d'erreurs pour le codec ADN

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Base ADN invalide: {0}")]
    InvalidBase(char),

    #[error("Longueur invalide: {len} n'est pas un multiple de {multiple}")]
    InvalidLength { len: usize, multiple: usize },

    #[error("Primer non reconnu en début ou fin de segment")]
    PrimerMismatch,

    #[error("Mot de code incorrigible: {0}")]
    Uncorrectable(String),

    #[error("Récupération des paramètres impossible: {0}")]
    ParameterRecovery(String),

    #[error("Erreur de conteneur: {0}")]
    Container(String),

    #[error("Erreur IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erreur de sérialisation: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erreur interne: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
