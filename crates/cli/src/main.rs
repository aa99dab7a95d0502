//! CLI d'archivage binaire en ADN

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

mod commands;
mod settings;
mod display;

use commands::{corrupt, decode, encode};

#[derive(Parser)]
#[command(name = "arcadn")]
#[command(about = "Encode un paquet d'information en ADN et le décode", long_about = None)]
#[command(version)]
struct Cli {
    /// Jeu de paramètres du fichier config.ini (ex. DEFAULT ou BIG)
    #[arg(long, default_value = "DEFAULT", global = true)]
    config: String,

    /// Émettre les statistiques en JSON plutôt qu'en table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode un fichier binaire en segments ADN
    Encode {
        /// Identifiant du paquet d'information, pilote le primer
        #[arg(long = "id")]
        package_id: Option<String>,

        /// Fichier binaire d'entrée (stdin par défaut)
        infile: Option<PathBuf>,

        /// Fichier ADN de sortie (stdout par défaut)
        outfile: Option<PathBuf>,
    },

    /// Décode un fichier ADN vers le binaire d'origine
    Decode {
        /// Identifiant du paquet d'information, pilote le primer
        #[arg(long = "id")]
        package_id: Option<String>,

        /// Fichier ADN d'entrée (stdin par défaut)
        infile: Option<PathBuf>,

        /// Fichier binaire de sortie (stdout par défaut)
        outfile: Option<PathBuf>,
    },

    /// Corrompt un fichier ADN pour les tests
    Corrupt {
        /// Taux d'erreur en pourcentage, dans [0, 100]
        #[arg(short = 'e', long, default_value = "0.5")]
        error_rate: f64,

        /// Fichier ADN d'entrée (stdin par défaut)
        infile: Option<PathBuf>,

        /// Fichier ADN corrompu de sortie (stdout par défaut)
        outfile: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    arcadn_core::logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            package_id,
            infile,
            outfile,
        } => encode::run(&cli.config, package_id, infile, outfile, cli.json),
        Commands::Decode {
            package_id,
            infile,
            outfile,
        } => decode::run(&cli.config, package_id, infile, outfile, cli.json),
        Commands::Corrupt {
            error_rate,
            infile,
            outfile,
        } => corrupt::run(error_rate, infile, outfile),
    }
}

/// Crée une barre de progression spinner
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb
}
