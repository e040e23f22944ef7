// ═══════════════════════════════════════════════════════════════════════
// Format driver — the pipeline both grammars share.
//
// Architecture:
//   Each grammar implements the small `Grammar` trait (split geometry and
//   per-line field parsing); the fixed pipeline order lives once in
//   `run`: split → continents → countries → adjacency → connectivity.
//   Malformed lines are skipped and recorded, never aborting their
//   block; section-count and connectivity failures abort the load and no
//   partial model escapes.
// ═══════════════════════════════════════════════════════════════════════

use crate::connectivity;
use crate::error::MapError;
use crate::model::MapModel;
use crate::section;
use crate::types::{Continent, Country, CountryId, IdAllocator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Which on-disk grammar a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapFormat {
    /// Sectioned whitespace grammar (intro, files, continent, countries,
    /// borders), CRLF line endings.
    Domination,
    /// Comma-delimited grammar (Map, continents, Territories), LF line
    /// endings, borders embedded in the territory lines.
    Conquest,
}

impl MapFormat {
    /// Guess the grammar from file content: conquest files open with
    /// their `[Map]` block, domination files with a free-text intro.
    pub fn detect(text: &str) -> MapFormat {
        if text.trim_start().starts_with("[Map]") {
            MapFormat::Conquest
        } else {
            MapFormat::Domination
        }
    }

    /// Parse a complete map in this grammar.
    pub fn parse_str(self, text: &str, alloc: &mut IdAllocator) -> Result<LoadedMap, MapError> {
        match self {
            MapFormat::Domination => crate::domination::parse_str(text, alloc),
            MapFormat::Conquest => crate::conquest::parse_str(text, alloc),
        }
    }

    /// Render a model back into this grammar.
    pub fn render(self, model: &MapModel) -> String {
        match self {
            MapFormat::Domination => crate::domination::render(model),
            MapFormat::Conquest => crate::conquest::render(model),
        }
    }
}

impl fmt::Display for MapFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapFormat::Domination => write!(f, "domination"),
            MapFormat::Conquest => write!(f, "conquest"),
        }
    }
}

/// Which block of the file a skipped line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Continents,
    Countries,
    Borders,
}

/// Diagnostic for one dropped input line. The sibling lines of its block
/// were still parsed.
#[derive(Debug)]
pub struct SkippedLine {
    pub section: Section,
    pub line: String,
    pub reason: MapError,
}

/// A successfully loaded, connectivity-checked map.
#[derive(Debug)]
pub struct LoadedMap {
    pub model: MapModel,
    /// Lines dropped during parsing, for caller diagnostics.
    pub skipped: Vec<SkippedLine>,
}

// ── Per-format grammar hooks ───────────────────────────────────────────

pub(crate) trait Grammar {
    /// Expected top-level block count; checked before anything parses.
    const SECTION_COUNT: usize;

    /// Line-ending cleanup applied before splitting.
    fn preprocess(text: &str) -> Cow<'_, str>;

    /// Capture the opaque preamble blocks (intro / graph metadata).
    fn take_preamble(model: &mut MapModel, parts: &[&str]);

    fn continent_block<'a>(parts: &[&'a str]) -> &'a str;
    fn country_block<'a>(parts: &[&'a str]) -> &'a str;
    fn border_block<'a>(parts: &[&'a str]) -> &'a str;

    fn parse_continent_line(line: &str, alloc: &mut IdAllocator) -> Result<Continent, MapError>;
    fn parse_country_line(
        line: &str,
        model: &MapModel,
        alloc: &mut IdAllocator,
    ) -> Result<Country, MapError>;
    fn parse_border_line(
        line: &str,
        model: &MapModel,
    ) -> Result<(CountryId, HashSet<CountryId>), MapError>;
}

// ── Shared pipeline ────────────────────────────────────────────────────

pub(crate) fn run<G: Grammar>(text: &str, alloc: &mut IdAllocator) -> Result<LoadedMap, MapError> {
    let text = G::preprocess(text);
    let parts = section::split(&text, G::SECTION_COUNT)?;

    let mut model = MapModel::new();
    let mut skipped = Vec::new();

    G::take_preamble(&mut model, &parts);

    let continents = parse_block(
        G::continent_block(&parts),
        Section::Continents,
        &mut skipped,
        |line| G::parse_continent_line(line, alloc),
    );
    model.add_continents(continents);

    let countries = parse_block(
        G::country_block(&parts),
        Section::Countries,
        &mut skipped,
        |line| G::parse_country_line(line, &model, alloc),
    );
    model.add_countries(countries);

    let borders = parse_block(
        G::border_block(&parts),
        Section::Borders,
        &mut skipped,
        |line| G::parse_border_line(line, &model),
    );
    let mut adjacency: HashMap<CountryId, HashSet<CountryId>> = HashMap::new();
    for (country, neighbors) in borders {
        adjacency.entry(country).or_default().extend(neighbors);
    }
    model.add_neighbors(adjacency);

    let report = connectivity::check(&model);
    if !report.is_strongly_connected() {
        return Err(MapError::NotConnected(report));
    }

    tracing::info!(
        continents = model.continent_count(),
        countries = model.country_count(),
        skipped = skipped.len(),
        "map loaded and validated"
    );

    Ok(LoadedMap { model, skipped })
}

/// Parse a block line by line. One bad line shrinks the result set by
/// one and is recorded; it never propagates past the block.
fn parse_block<T>(
    block: &str,
    section: Section,
    skipped: &mut Vec<SkippedLine>,
    mut parse_line: impl FnMut(&str) -> Result<T, MapError>,
) -> Vec<T> {
    let mut parsed = Vec::new();
    for raw in block.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(entity) => parsed.push(entity),
            Err(reason) => {
                tracing::warn!(?section, line, %reason, "skipping unparsable line");
                skipped.push(SkippedLine {
                    section,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }
    parsed
}
