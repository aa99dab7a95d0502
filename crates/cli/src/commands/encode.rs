//! Commande d'encodage

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use arcadn_core::Encoder;

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
    let payload = read_input(infile.as_ref())?;

    let spinner = create_spinner("Encodage en ADN...");
    let mut encoder = Encoder::new(params)?;
    let text = encoder.encode_to_text(&payload)?;
    spinner.finish_and_clear();

    write_output(outfile.as_ref(), text.as_bytes())?;
    display::stats::emit(encoder.stats(), json)?;
    eprintln!(
        "{} {} octets encodés en {} segments",
        style("✓").green(),
        payload.len(),
        encoder.stats().segments.count
    );
    Ok(())
}
