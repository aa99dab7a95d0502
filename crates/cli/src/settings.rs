//! Chargement des paramètres depuis config.ini
//!
//! Le fichier est optionnel: sans lui, les paramètres par défaut du codec
//! s'appliquent. Chaque section du fichier (`[DEFAULT]`, `[BIG]`, …) décrit
//! un jeu de paramètres; l'option `--config` choisit la section.

use anyhow::{Context, Result};
use config::{Config, File, FileFormat, Map, Value};

use arcadn_core::CodecParams;

const CONFIG_FILE: &str = "config.ini";

/// Construit les paramètres du codec depuis la section demandée
///
/// Sans identifiant de paquet, le primer est désactivé.
pub fn load_params(section: &str, package_id: Option<String>) -> Result<CodecParams> {
    let settings = Config::builder()
        .add_source(File::new(CONFIG_FILE, FileFormat::Ini).required(false))
        .build()
        .context("lecture de config.ini")?;

    // config-rs abaisse les clés en minuscules
    let table = settings
        .get_table(&section.to_lowercase())
        .unwrap_or_default();

    let mut params = CodecParams::default();
    if let Some(v) = get_usize(&table, "primer_length")? {
        params.primer_length = v;
    }
    if let Some(v) = get_usize(&table, "mi")? {
        params.mi = v;
    }
    if let Some(v) = get_usize(&table, "mo")? {
        params.mo = v;
    }
    if let Some(v) = get_usize(&table, "index_length")? {
        params.index_length = v;
    }
    if let Some(v) = get_usize(&table, "index_positions")? {
        params.index_positions = v;
    }
    if let Some(v) = get_usize(&table, "n")? {
        params.n = v;
    }
    if let Some(v) = get_usize(&table, "k")? {
        params.k = v;
    }
    if let Some(v) = table.get("target_redundancy") {
        params.target_redundancy = v
            .clone()
            .into_float()
            .context("target_redundancy invalide")?;
    }
    if let Some(v) = table.get("auto_zip") {
        params.auto_zip = v.clone().into_bool().context("auto_zip invalide")?;
    }

    params.package_id = package_id;
    if params.package_id.is_none() {
        params.primer_length = 0;
    }
    Ok(params)
}

fn get_usize(table: &Map<String, Value>, key: &str) -> Result<Option<usize>> {
    match table.get(key) {
        Some(v) => {
            let n = v
                .clone()
                .into_int()
                .with_context(|| format!("option {key} invalide"))?;
            Ok(Some(n as usize))
        }
        None => Ok(None),
    }
}
