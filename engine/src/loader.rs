// ═══════════════════════════════════════════════════════════════════════
// File layer — whole-file, blocking reads and writes around the format
// drivers. The only module that touches the filesystem.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapError;
use crate::format::{LoadedMap, MapFormat};
use crate::model::MapModel;
use crate::types::IdAllocator;
use std::fs;
use std::path::Path;

/// Outcome of loading a map path.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The backing file did not exist; an empty file was created and
    /// nothing was parsed. Distinct from parsing an empty-but-present
    /// file, which fails the section-count precondition.
    Created,
    /// The file existed and parsed into a validated map.
    Loaded(LoadedMap),
}

/// Load a map file. A missing file is created empty and reported as
/// [`LoadOutcome::Created`]. When `format` is `None` the grammar is
/// detected from the file content.
pub fn load_map_file(
    path: &Path,
    format: Option<MapFormat>,
    alloc: &mut IdAllocator,
) -> Result<LoadOutcome, MapError> {
    if !path.exists() {
        fs::write(path, "")?;
        tracing::info!(path = %path.display(), "map file did not exist, created an empty one");
        return Ok(LoadOutcome::Created);
    }

    let text = fs::read_to_string(path)?;
    let format = format.unwrap_or_else(|| MapFormat::detect(&text));
    let loaded = format.parse_str(&text, alloc)?;
    Ok(LoadOutcome::Loaded(loaded))
}

/// Persist the model in the given grammar. The connectivity gate runs
/// again first: interactive edits must not write out a broken map.
pub fn save_map_file(path: &Path, format: MapFormat, model: &MapModel) -> Result<(), MapError> {
    let report = model.connectivity();
    if !report.is_strongly_connected() {
        return Err(MapError::NotConnected(report));
    }

    fs::write(path, format.render(model))?;
    tracing::info!(path = %path.display(), %format, "map saved");
    Ok(())
}
