//! One-shot resolution pipeline
//!
//! Wires the stages together in fixed order: output guard, inventory,
//! layout, namespace resolution, correlation, write. Everything between
//! the guard and the final write is a pure function over in-memory
//! inputs; only this module's edges touch the tool and the filesystem.

use baymap_common::mapfile;
use tracing::info;

use crate::config::Config;
use crate::correlate::{self, Correlation};
use crate::error::{BaymapError, Result};
use crate::inventory;
use crate::layout;
use crate::symlink;

/// Resolves the chassis and writes the map artifact.
///
/// Returns the correlation outcome so the caller can report skipped
/// bays. Nothing is written unless every fatal check passed; the output
/// guard runs before the management tool is even invoked.
pub async fn run(config: &Config, strict: bool) -> Result<Correlation> {
    // Guard early so a present artifact costs no tool invocation. The
    // writer re-checks with create_new, covering the race window.
    if config.paths.output.exists() {
        return Err(BaymapError::OutputExists {
            path: config.paths.output.clone(),
        });
    }

    let controllers = inventory::fetch(&config.tool.storcli_bin, config.tool.timeout()).await?;
    let layout = layout::load(&config.paths.layout)?;

    let candidates = correlate::path_candidates(&layout, &controllers)?;
    let path_namespace = symlink::resolve_namespace(&config.paths.by_path_dir, &candidates)?;
    let id_names = symlink::discover_names(&config.paths.by_id_dir, &config.paths.id_prefix)?;
    let id_namespace = symlink::resolve_namespace(&config.paths.by_id_dir, &id_names)?;

    let outcome = correlate::correlate(&layout, &controllers, &path_namespace, &id_namespace, strict)?;

    mapfile::write(&config.paths.output, &outcome.map)?;
    info!(
        path = %config.paths.output.display(),
        mapped = outcome.map.len(),
        skipped = outcome.skipped.len(),
        "wrote bay map"
    );
    Ok(outcome)
}
