//! Commande de corruption, pour les tests

use anyhow::{bail, Context, Result};
use console::style;
use std::path::PathBuf;

use arcadn_simulation::SubstitutionChannel;

use crate::commands::{read_input, write_output};

pub fn run(error_rate: f64, infile: Option<PathBuf>, outfile: Option<PathBuf>) -> Result<()> {
    if !(0.0..=100.0).contains(&error_rate) {
        bail!("le taux d'erreur doit être dans [0, 100], reçu {error_rate}");
    }
    let text = String::from_utf8(read_input(infile.as_ref())?).context("le fichier ADN n'est pas de l'UTF-8")?;

    let mut channel = SubstitutionChannel::from_entropy(error_rate / 100.0);
    let (corrupted, report) = channel.corrupt_text(&text);
    write_output(outfile.as_ref(), corrupted.as_bytes())?;

    eprintln!(
        "{} segments corrompus: {} / {}",
        style("✓").green(),
        report.corrupted_segments,
        report.total_segments
    );
    eprintln!("Substitutions de bases: {}", report.corrupted_bases);
    Ok(())
}
