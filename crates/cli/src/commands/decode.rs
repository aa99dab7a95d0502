//! Commande de décodage

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use arcadn_core::Decoder;

use crate::commands::{read_input, write_output};
use crate::settings::load_params;
use crate::create_spinner;
use crate::display;

pub fn run(
    config_section: &str,
    package_id: Option<String>,
    infile: Option<PathBuf>,
    outfile: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let params = load_params(config_section, package_id)?;
    let text = String::from_utf8(read_input(infile.as_ref())?).context("le fichier ADN n'est pas de l'UTF-8")?;

    let spinner = create_spinner("Décodage du pool ADN...");
    let mut decoder = Decoder::new(params)?;
    let payload = decoder.decode(&text)?;
    spinner.finish_and_clear();

    write_output(outfile.as_ref(), &payload)?;
    display::stats::emit(decoder.stats(), json)?;

    let stats = decoder.stats();
    if stats.error {
        eprintln!(
            "{} décodage dégradé: {}",
            style("!").yellow(),
            stats.error_message.trim_end()
        );
    } else {
        eprintln!(
            "{} {} octets restitués depuis {} segments",
            style("✓").green(),
            payload.len(),
            stats.segments.count
        );
    }
    Ok(())
}
