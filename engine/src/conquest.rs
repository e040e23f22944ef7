// ═══════════════════════════════════════════════════════════════════════
// Conquest grammar — the comma-delimited format.
//
//   [Map]          opaque graph metadata
//   [continents]   <name>=<value>
//   [Territories]  <name>,<x>,<y>,<continentName>,<neighborName>,...
//
// LF line endings (stray CRs are stripped first), exactly 3 top-level
// sections. Country ids are always generated; continent and neighbor
// references resolve by normalized name. The territory block is read
// twice: once for the countries, once for the borders embedded in the
// same lines.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapError;
use crate::format::{self, Grammar, LoadedMap};
use crate::model::MapModel;
use crate::section;
use crate::types::{normalize, Continent, Country, CountryId, IdAllocator};
use std::borrow::Cow;
use std::collections::HashSet;

pub const EOL: &str = "\n";

/// Parse a complete conquest-format map from raw text.
pub fn parse_str(text: &str, alloc: &mut IdAllocator) -> Result<LoadedMap, MapError> {
    format::run::<Conquest>(text, alloc)
}

pub(crate) struct Conquest;

impl Grammar for Conquest {
    const SECTION_COUNT: usize = 3;

    fn preprocess(text: &str) -> Cow<'_, str> {
        if text.contains('\r') {
            Cow::Owned(text.replace('\r', ""))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn take_preamble(model: &mut MapModel, parts: &[&str]) {
        model.map_graph = section::body(parts[0]).to_string();
    }

    fn continent_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[1])
    }

    fn country_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[2])
    }

    // Borders live in the territory lines themselves.
    fn border_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[2])
    }

    fn parse_continent_line(line: &str, alloc: &mut IdAllocator) -> Result<Continent, MapError> {
        let tokens: Vec<&str> = line.split('=').collect();
        if tokens.len() != 2 {
            return Err(continent_error(line, "expected <name>=<value>"));
        }
        let value: i32 = tokens[1]
            .trim()
            .parse()
            .map_err(|_| continent_error(line, "value is not an integer"))?;

        Ok(Continent {
            id: alloc.next_continent(),
            name: normalize(tokens[0]),
            value,
            color: None,
        })
    }

    fn parse_country_line(
        line: &str,
        model: &MapModel,
        alloc: &mut IdAllocator,
    ) -> Result<Country, MapError> {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() < 4 {
            return Err(country_error(line, "expected <name>,<x>,<y>,<continentName>"));
        }

        let coordinate_x: i32 = tokens[1]
            .trim()
            .parse()
            .map_err(|_| country_error(line, "coordinate is not an integer"))?;
        let coordinate_y: i32 = tokens[2]
            .trim()
            .parse()
            .map_err(|_| country_error(line, "coordinate is not an integer"))?;

        let continent_name = normalize(tokens[3]);
        let continent_id = model
            .continent_id_by_name(&continent_name)
            .ok_or_else(|| country_error(line, "contains invalid continent information"))?;

        Ok(Country {
            id: alloc.next_country(),
            name: normalize(tokens[0]),
            continent_id,
            continent_name,
            coordinate_x,
            coordinate_y,
        })
    }

    fn parse_border_line(
        line: &str,
        model: &MapModel,
    ) -> Result<(CountryId, HashSet<CountryId>), MapError> {
        let tokens: Vec<&str> = line.split(',').collect();
        if tokens.len() < 4 {
            return Err(neighbor_error(line, "expected at least 4 fields"));
        }

        let country = model
            .country_id_by_name(tokens[0])
            .ok_or_else(|| neighbor_error(line, "territory name does not resolve"))?;

        let mut neighbors = HashSet::new();
        for name in &tokens[4..] {
            let id = model
                .country_id_by_name(name)
                .ok_or_else(|| neighbor_error(line, "neighbor name does not resolve"))?;
            neighbors.insert(id);
        }

        Ok((country, neighbors))
    }
}

fn continent_error(line: &str, reason: &str) -> MapError {
    MapError::ContinentLine {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

fn country_error(line: &str, reason: &str) -> MapError {
    MapError::CountryLine {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

fn neighbor_error(line: &str, reason: &str) -> MapError {
    MapError::NeighborLine {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

// ── Serialization ──────────────────────────────────────────────────────

/// Render the model back into the conquest grammar. Each territory line
/// carries its own neighbor names, reconstructed from the stored mapping.
pub fn render(model: &MapModel) -> String {
    let mut out = String::from("[Map]");
    out.push_str(EOL);
    if !model.map_graph.is_empty() {
        out.push_str(&model.map_graph);
        if !model.map_graph.ends_with('\n') {
            out.push_str(EOL);
        }
    }

    out.push_str("[continents]");
    out.push_str(EOL);
    for continent in model.continents() {
        out.push_str(&format!("{}={}{}", continent.name, continent.value, EOL));
    }

    out.push_str("[Territories]");
    out.push_str(EOL);
    for country in model.countries() {
        out.push_str(&format!(
            "{},{},{},{}",
            country.name, country.coordinate_x, country.coordinate_y, country.continent_name,
        ));
        if let Some(neighbors) = model.neighbors(country.id) {
            let mut ids: Vec<CountryId> = neighbors.iter().copied().collect();
            ids.sort_unstable();
            for id in ids {
                out.push(',');
                out.push_str(model.country_name(id).unwrap_or_default());
            }
        }
        out.push_str(EOL);
    }

    out
}
