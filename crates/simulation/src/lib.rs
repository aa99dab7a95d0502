//! Simulation d'erreurs de stockage ADN
//!
//! Canal de substitution minimaliste pour les tests et la commande
//! `corrupt`: chaque base est basculée vers son complément avec une
//! probabilité donnée. Les insertions et délétions ne sont pas simulées.

pub mod channel;

pub use channel::{CorruptionReport, SubstitutionChannel};
