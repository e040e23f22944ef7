// ═══════════════════════════════════════════════════════════════════════
// Domination grammar — the sectioned whitespace format.
//
//   <free-text intro>
//   [files]    opaque graph metadata
//   [continent]  <name> <value> <color>
//   [countries]  <id> <name> <continentId> <x> <y>
//   [borders]    <countryId> <neighborId> ...
//
// CRLF line endings, exactly 5 top-level sections. Country ids are
// caller-supplied by the file; continent references are numeric ids.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::MapError;
use crate::format::{self, Grammar, LoadedMap};
use crate::model::MapModel;
use crate::section;
use crate::types::{normalize, Continent, ContinentId, Country, CountryId, IdAllocator};
use std::borrow::Cow;
use std::collections::HashSet;

pub const EOL: &str = "\r\n";

/// Parse a complete domination-format map from raw text.
pub fn parse_str(text: &str, alloc: &mut IdAllocator) -> Result<LoadedMap, MapError> {
    format::run::<Domination>(text, alloc)
}

pub(crate) struct Domination;

impl Grammar for Domination {
    const SECTION_COUNT: usize = 5;

    fn preprocess(text: &str) -> Cow<'_, str> {
        Cow::Borrowed(text)
    }

    fn take_preamble(model: &mut MapModel, parts: &[&str]) {
        model.map_intro = parts[0].trim_end().to_string();
        model.map_graph = section::body(parts[1]).to_string();
    }

    fn continent_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[2])
    }

    fn country_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[3])
    }

    fn border_block<'a>(parts: &[&'a str]) -> &'a str {
        section::body(parts[4])
    }

    fn parse_continent_line(line: &str, alloc: &mut IdAllocator) -> Result<Continent, MapError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 {
            return Err(continent_error(line, "expected <name> <value> <color>"));
        }
        let value: i32 = tokens[1]
            .parse()
            .map_err(|_| continent_error(line, "value is not an integer"))?;

        Ok(Continent {
            id: alloc.next_continent(),
            name: normalize(tokens[0]),
            value,
            color: Some(normalize(tokens[2])),
        })
    }

    fn parse_country_line(
        line: &str,
        model: &MapModel,
        _alloc: &mut IdAllocator,
    ) -> Result<Country, MapError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 5 {
            return Err(country_error(line, "expected <id> <name> <continentId> <x> <y>"));
        }

        let id = CountryId(
            tokens[0]
                .parse()
                .map_err(|_| country_error(line, "country id is not an integer"))?,
        );
        let continent_id = ContinentId(
            tokens[2]
                .parse()
                .map_err(|_| country_error(line, "continent id is not an integer"))?,
        );
        let coordinate_x: i32 = tokens[3]
            .parse()
            .map_err(|_| country_error(line, "coordinate is not an integer"))?;
        let coordinate_y: i32 = tokens[4]
            .parse()
            .map_err(|_| country_error(line, "coordinate is not an integer"))?;

        let continent_name = model
            .continent_name(continent_id)
            .ok_or_else(|| country_error(line, "contains invalid continent information"))?
            .to_string();

        Ok(Country {
            id,
            name: normalize(tokens[1]),
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
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(neighbor_error(line, "a country must declare at least one neighbor"));
        }

        let mut ids = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let id: u32 = token
                .parse()
                .map_err(|_| neighbor_error(line, "token is not a non-negative integer"))?;
            let id = CountryId(id);
            if !model.country_exists(id) {
                return Err(neighbor_error(line, "references a country id that does not exist"));
            }
            ids.push(id);
        }

        let country = ids[0];
        let neighbors = ids[1..].iter().copied().collect();
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

/// Render the model back into the domination grammar. Not byte-identical
/// to the source file (normalization is lossy), but parsing the output
/// again yields an equivalent model.
pub fn render(model: &MapModel) -> String {
    let mut out = String::new();

    if model.map_intro.is_empty() {
        out.push_str("map");
    } else {
        out.push_str(&model.map_intro);
    }
    out.push_str(EOL);

    out.push_str("[files]");
    out.push_str(EOL);
    push_verbatim(&mut out, &model.map_graph);

    out.push_str("[continent]");
    out.push_str(EOL);
    for continent in model.continents() {
        out.push_str(&format!(
            "{} {} {}{}",
            continent.name,
            continent.value,
            continent.color.as_deref().unwrap_or("0"),
            EOL,
        ));
    }

    out.push_str("[countries]");
    out.push_str(EOL);
    for country in model.countries() {
        out.push_str(&format!(
            "{} {} {} {} {}{}",
            country.id,
            country.name,
            country.continent_id,
            country.coordinate_x,
            country.coordinate_y,
            EOL,
        ));
    }

    out.push_str("[borders]");
    out.push_str(EOL);
    for country in model.countries() {
        if let Some(neighbors) = model.neighbors(country.id) {
            let mut ids: Vec<CountryId> = neighbors.iter().copied().collect();
            ids.sort_unstable();
            out.push_str(&country.id.to_string());
            for id in ids {
                out.push(' ');
                out.push_str(&id.to_string());
            }
            out.push_str(EOL);
        }
    }

    out
}

fn push_verbatim(out: &mut String, block: &str) {
    if !block.is_empty() {
        out.push_str(block);
        if !block.ends_with('\n') {
            out.push_str(EOL);
        }
    }
}
