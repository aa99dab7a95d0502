//! Bibliothèque d'archivage binaire en ADN
//!
//! Encode un paquet d'information binaire en un ensemble de courts segments
//! ADN auto-descriptifs, et le décode malgré des substitutions de bases, des
//! segments perdus et un pool désordonné. Deux codes Reed-Solomon concaténés
//! portent la redondance: le code interne protège chaque segment, le code
//! externe protège chaque ligne d'un bloc de segments.

pub mod archive;
pub mod bases;
pub mod codec;
pub mod error;
pub mod gf;
pub mod layout;
pub mod logging;
pub mod mask;
pub mod params;
pub mod primer;
pub mod rs;
pub mod stats;

// Réexportations principales
pub use codec::{BlockGeometry, Decoder, Encoder};
pub use error::{CodecError, Result};
pub use layout::{LayoutStore, MemoryLayout};
pub use params::CodecParams;
pub use primer::Primer;
pub use stats::CodecStats;
