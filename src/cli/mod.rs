//! CLI Module
//!
//! Command-line interface for the Overture compositor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Overture - audio timeline compositor for spoken-word intros
#[derive(Parser, Debug)]
#[command(name = "overture")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose an intro from decoded source files and write the MP3
    #[command(name = "compose")]
    Compose {
        /// Background music bed (WAV)
        #[arg(long)]
        bed: PathBuf,

        /// Synthesized speech segment (WAV)
        #[arg(long)]
        speech: PathBuf,

        /// Transition effect (WAV, optional)
        #[arg(long)]
        effect: Option<PathBuf>,

        /// Recipe JSON file; omitted fields fall back to defaults
        #[arg(long)]
        recipe: Option<PathBuf>,

        /// Output MP3 path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the timeline plan for three source durations as JSON
    #[command(name = "plan")]
    Plan {
        /// Bed duration in milliseconds
        #[arg(long)]
        bed_ms: u64,

        /// Speech duration in milliseconds
        #[arg(long)]
        speech_ms: u64,

        /// Effect duration in milliseconds (optional)
        #[arg(long)]
        effect_ms: Option<u64>,

        /// Recipe JSON file; omitted fields fall back to defaults
        #[arg(long)]
        recipe: Option<PathBuf>,
    },
}
