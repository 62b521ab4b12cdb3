//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::audio::import_audio;
use crate::compose::compose_intro;
use crate::error::Result;
use crate::timeline::{plan, BufferMeta, Recipe};

/// Compose an intro from source files and write the encoded output.
pub fn compose(
    bed: &Path,
    speech: &Path,
    effect: Option<&Path>,
    recipe: Option<&Path>,
    output: &Path,
) -> Result<()> {
    let recipe = load_recipe(recipe)?;

    info!("Loading bed: {}", bed.display());
    let bed_buf = import_audio(bed)?;
    info!("Loading speech: {}", speech.display());
    let speech_buf = import_audio(speech)?;
    let effect_buf = match effect {
        Some(path) => {
            info!("Loading effect: {}", path.display());
            Some(import_audio(path)?)
        }
        None => None,
    };

    let result = compose_intro(&bed_buf, effect_buf.as_ref(), &speech_buf, &recipe)?;
    fs::write(output, &result.bytes)?;

    println!(
        "Composed {}ms intro ({} regions)",
        result.plan.total_duration_ms,
        result.plan.regions.len()
    );
    println!(
        "Wrote {} bytes of {} to {}",
        result.bytes.len(),
        result.format.content_type,
        output.display()
    );

    Ok(())
}

/// Build and print a timeline plan from durations alone.
///
/// Planning needs nothing but lengths, so this works without any audio
/// files on disk.
pub fn print_plan(
    bed_ms: u64,
    speech_ms: u64,
    effect_ms: Option<u64>,
    recipe: Option<&Path>,
) -> Result<()> {
    let recipe = load_recipe(recipe)?;

    let plan = plan(
        BufferMeta::new(bed_ms),
        effect_ms.map(BufferMeta::new),
        BufferMeta::new(speech_ms),
        &recipe,
    )?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

/// Load a recipe from a JSON file, or fall back to the default recipe.
fn load_recipe(path: Option<&Path>) -> Result<Recipe> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let recipe = serde_json::from_str(&text)?;
            info!("Loaded recipe from {}", path.display());
            Ok(recipe)
        }
        None => Ok(Recipe::default()),
    }
}
