//! Overture CLI - Audio Timeline Compositor
//!
//! Command-line interface for composing spoken-word intros.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use overture::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Compose {
            bed,
            speech,
            effect,
            recipe,
            output,
        } => commands::compose(
            &bed,
            &speech,
            effect.as_deref(),
            recipe.as_deref(),
            &output,
        )
        .context("composition failed"),
        Commands::Plan {
            bed_ms,
            speech_ms,
            effect_ms,
            recipe,
        } => commands::print_plan(bed_ms, speech_ms, effect_ms, recipe.as_deref())
            .context("planning failed"),
    }
}
