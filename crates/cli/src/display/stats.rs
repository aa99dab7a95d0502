//! Affichage des statistiques d'une session

use anyhow::Result;
use tabled::settings::Style;
use tabled::{builder::Builder, Table};

use arcadn_core::CodecStats;

/// Émet les statistiques sur stderr, en table ou en JSON
pub fn emit(stats: &CodecStats, json: bool) -> Result<()> {
    if json {
        eprintln!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        eprintln!("{}", render_table(stats));
    }
    Ok(())
}

fn render_table(stats: &CodecStats) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["statistique", "valeur"]);
    builder.push_record(["segments", &stats.segments.count.to_string()]);
    builder.push_record([
        "taille segment (min/méd/max)",
        &format!(
            "{}/{}/{}",
            stats.segments.size_min, stats.segments.size_median, stats.segments.size_max
        ),
    ]);
    builder.push_record(["taille binaire (octets)", &stats.binary_size.to_string()]);
    builder.push_record([
        "redondance interne",
        &format!("{:.3}", stats.redundancy.inner),
    ]);
    builder.push_record([
        "redondance externe",
        &format!("{:.3}", stats.redundancy.outer),
    ]);
    builder.push_record([
        "densité d'information",
        &format!("{:.3}", stats.redundancy.information_density),
    ]);
    builder.push_record([
        "corrections internes",
        &stats.corrections.inner.to_string(),
    ]);
    builder.push_record(["corrections externes", &stats.corrections.outer.to_string()]);
    builder.push_record([
        "segments irrécupérables",
        &stats.corrections.segments_beyond_repair.to_string(),
    ]);
    builder.push_record([
        "segments perdus",
        &stats.corrections.segments_lost.to_string(),
    ]);
    builder.push_record([
        "paramètres (mi/mo/N/K)",
        &format!(
            "{}/{}/{}/{}",
            stats.parameters.mi, stats.parameters.mo, stats.parameters.n, stats.parameters.k
        ),
    ]);
    builder.push_record([
        "parité externe (necso)",
        &stats.parameters.necso.to_string(),
    ]);
    builder.push_record(["blocs", &stats.parameters.numblocks.to_string()]);
    if let Some(primer) = &stats.parameters.primer {
        builder.push_record(["primer", primer]);
    }
    if stats.error {
        builder.push_record(["erreur code externe", "oui"]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table
}
