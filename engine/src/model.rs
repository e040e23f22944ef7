// ═══════════════════════════════════════════════════════════════════════
// Map model — the shared in-memory graph both grammars parse into.
// Read-only topology plus the query/mutation surface used by game-state
// controllers and the interactive editor.
// ═══════════════════════════════════════════════════════════════════════

use crate::connectivity::{self, ConnectivityReport};
use crate::types::{normalize, Continent, ContinentId, Country, CountryId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Continents, countries, and the directed border relation, plus the
/// opaque preamble text carried along for round-trip serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapModel {
    continents: HashMap<ContinentId, Continent>,
    countries: HashMap<CountryId, Country>,
    adjacency: HashMap<CountryId, HashSet<CountryId>>,
    /// Free-text intro line(s) preceding the first section (domination
    /// format only). Not interpreted.
    pub map_intro: String,
    /// Opaque graph metadata block, preserved verbatim.
    pub map_graph: String,
}

impl MapModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// All continents, ordered by id.
    pub fn continents(&self) -> Vec<&Continent> {
        let mut all: Vec<&Continent> = self.continents.values().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    /// All countries, ordered by id.
    pub fn countries(&self) -> Vec<&Country> {
        let mut all: Vec<&Country> = self.countries.values().collect();
        all.sort_by_key(|c| c.id);
        all
    }

    pub fn continent_count(&self) -> usize {
        self.continents.len()
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn continent(&self, id: ContinentId) -> Option<&Continent> {
        self.continents.get(&id)
    }

    pub fn country(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    pub fn continent_exists(&self, id: ContinentId) -> bool {
        self.continents.contains_key(&id)
    }

    pub fn country_exists(&self, id: CountryId) -> bool {
        self.countries.contains_key(&id)
    }

    pub fn continent_name(&self, id: ContinentId) -> Option<&str> {
        self.continents.get(&id).map(|c| c.name.as_str())
    }

    pub fn country_name(&self, id: CountryId) -> Option<&str> {
        self.countries.get(&id).map(|c| c.name.as_str())
    }

    /// Resolve a continent by name. The query token is normalized first,
    /// so lookups are whitespace- and case-insensitive.
    pub fn continent_id_by_name(&self, name: &str) -> Option<ContinentId> {
        let wanted = normalize(name);
        self.continents
            .values()
            .find(|c| c.name == wanted)
            .map(|c| c.id)
    }

    /// Resolve a country by name, normalized like
    /// [`continent_id_by_name`](Self::continent_id_by_name).
    pub fn country_id_by_name(&self, name: &str) -> Option<CountryId> {
        let wanted = normalize(name);
        self.countries
            .values()
            .find(|c| c.name == wanted)
            .map(|c| c.id)
    }

    /// The full directed adjacency mapping.
    pub fn adjacency(&self) -> &HashMap<CountryId, HashSet<CountryId>> {
        &self.adjacency
    }

    pub fn neighbors(&self, id: CountryId) -> Option<&HashSet<CountryId>> {
        self.adjacency.get(&id)
    }

    pub(crate) fn country_ids(&self) -> Vec<CountryId> {
        self.countries.keys().copied().collect()
    }

    // ── Connectivity ───────────────────────────────────────────────────

    pub fn connectivity(&self) -> ConnectivityReport {
        connectivity::check(self)
    }

    pub fn is_strongly_connected(&self) -> bool {
        self.connectivity().is_strongly_connected()
    }

    // ── Mutations (parsers and interactive editing) ────────────────────

    pub fn add_continent(&mut self, continent: Continent) {
        self.continents.insert(continent.id, continent);
    }

    pub fn add_continents(&mut self, continents: impl IntoIterator<Item = Continent>) {
        for continent in continents {
            self.add_continent(continent);
        }
    }

    pub fn add_country(&mut self, country: Country) {
        self.countries.insert(country.id, country);
    }

    pub fn add_countries(&mut self, countries: impl IntoIterator<Item = Country>) {
        for country in countries {
            self.add_country(country);
        }
    }

    pub fn add_neighbor(&mut self, from: CountryId, to: CountryId) {
        self.adjacency.entry(from).or_default().insert(to);
    }

    /// Merge a parsed adjacency mapping into the model.
    pub fn add_neighbors(&mut self, mapping: HashMap<CountryId, HashSet<CountryId>>) {
        for (from, tos) in mapping {
            self.adjacency.entry(from).or_default().extend(tos);
        }
    }

    pub fn remove_neighbor(&mut self, from: CountryId, to: CountryId) {
        if let Some(set) = self.adjacency.get_mut(&from) {
            set.remove(&to);
            if set.is_empty() {
                self.adjacency.remove(&from);
            }
        }
    }

    /// Remove a country together with its adjacency row and every
    /// appearance in other countries' neighbor sets.
    pub fn remove_country(&mut self, id: CountryId) -> Option<Country> {
        let removed = self.countries.remove(&id)?;
        self.adjacency.remove(&id);
        for set in self.adjacency.values_mut() {
            set.remove(&id);
        }
        self.adjacency.retain(|_, set| !set.is_empty());
        Some(removed)
    }

    /// Remove a continent; its countries (and their borders) go first.
    pub fn remove_continent(&mut self, id: ContinentId) -> Option<Continent> {
        let removed = self.continents.remove(&id)?;
        let orphans: Vec<CountryId> = self
            .countries
            .values()
            .filter(|c| c.continent_id == id)
            .map(|c| c.id)
            .collect();
        for country in orphans {
            self.remove_country(country);
        }
        Some(removed)
    }
}
