// ═══════════════════════════════════════════════════════════════════════
// Error taxonomy — every way a map load (or one line inside it) can be
// rejected. Line-level variants never abort a block; they become
// SkippedLine diagnostics. Section-level and connectivity failures abort
// the whole load.
// ═══════════════════════════════════════════════════════════════════════

use crate::connectivity::ConnectivityReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// Wrong number of top-level sections; the load aborts before any
    /// per-section parsing starts.
    #[error("the map is not valid: expected {expected} sections, found {found}")]
    MissingSections { expected: usize, found: usize },

    /// A single continent line is malformed.
    #[error("continent \"{line}\" is not valid: {reason}")]
    ContinentLine { line: String, reason: String },

    /// A single country line is malformed or references an unknown
    /// continent.
    #[error("country \"{line}\" is not valid: {reason}")]
    CountryLine { line: String, reason: String },

    /// A single border declaration is malformed or references an unknown
    /// country.
    #[error("adjacency \"{line}\" is not valid: {reason}")]
    NeighborLine { line: String, reason: String },

    /// The parsed adjacency graph failed the strong-connectivity gate.
    #[error("the map is not strongly connected: {0}")]
    NotConnected(ConnectivityReport),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
