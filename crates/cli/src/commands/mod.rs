//! Sous-commandes de la CLI

pub mod corrupt;
pub mod decode;
pub mod encode;

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Lit le fichier d'entrée, ou stdin à défaut
pub fn read_input(infile: Option<&PathBuf>) -> Result<Vec<u8>> {
    match infile {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("lecture de {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("lecture de stdin")?;
            Ok(buf)
        }
    }
}

/// Écrit vers le fichier de sortie, ou stdout à défaut
pub fn write_output(outfile: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match outfile {
        Some(path) => {
            std::fs::write(path, data).with_context(|| format!("écriture de {}", path.display()))
        }
        None => {
            std::io::stdout().write_all(data).context("écriture sur stdout")?;
            Ok(())
        }
    }
}
