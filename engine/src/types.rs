// ═══════════════════════════════════════════════════════════════════════
// Core types — continents, countries, and the id allocator shared by
// both map grammars.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Identifiers ────────────────────────────────────────────────────────
// Compact, copyable ids. Generated by the allocator (or caller-supplied
// for domination-format countries), never reused within a session.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ContinentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CountryId(pub u32);

impl fmt::Display for ContinentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Continent ──────────────────────────────────────────────────────────

/// A named grouping of countries carrying a reinforcement-value weight.
/// Immutable once created within a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub id: ContinentId,
    /// Normalized name (see [`normalize`]).
    pub name: String,
    /// Reinforcement armies awarded for holding the whole continent.
    pub value: i32,
    /// Display color. Only the domination grammar carries one.
    pub color: Option<String>,
}

// ── Country ────────────────────────────────────────────────────────────

/// A named territory belonging to exactly one continent, with 2D display
/// coordinates. The continent name is a denormalized cache of the
/// continent's own (normalized) name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub continent_id: ContinentId,
    pub continent_name: String,
    pub coordinate_x: i32,
    pub coordinate_y: i32,
}

// ── Name normalization ─────────────────────────────────────────────────

/// Strip all whitespace and lower-case with a locale-insensitive fold.
/// Two tokens differing only in case or embedded whitespace name the
/// same entity.
pub fn normalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Id allocator ───────────────────────────────────────────────────────

/// Two monotonic counters shared across a parse session. The caller
/// either resets it between loads or continues an existing sequence when
/// appending to a live session (interactive editing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_continent: u32,
    next_country: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue an existing id sequence. The next generated ids will be
    /// `continent + 1` and `country + 1`.
    pub fn with_offsets(continent: u32, country: u32) -> Self {
        Self {
            next_continent: continent,
            next_country: country,
        }
    }

    pub fn next_continent(&mut self) -> ContinentId {
        self.next_continent += 1;
        ContinentId(self.next_continent)
    }

    pub fn next_country(&mut self) -> CountryId {
        self.next_country += 1;
        CountryId(self.next_country)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
