// ═══════════════════════════════════════════════════════════════════════
// Topology validator — strong connectivity over the directed adjacency
// relation. Border lines are stored as authored (one direction per
// line), so reachability is checked from an arbitrary start country over
// the mapping AND over its transpose; both sweeps must cover every
// registered country. This catches one-way border declarations, a real
// authoring error in source map files.
// ═══════════════════════════════════════════════════════════════════════

use crate::model::MapModel;
use crate::types::CountryId;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Structured outcome of the strong-connectivity check. Identifies the
/// countries left out in each sweep direction instead of collapsing to a
/// bare boolean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    /// Number of registered countries at check time.
    pub countries: usize,
    /// The start country both sweeps ran from (lowest id).
    pub start: Option<CountryId>,
    /// Countries not reachable from the start following edges forward.
    pub unreachable_forward: Vec<CountryId>,
    /// Countries that cannot reach the start (unreachable over the
    /// transpose relation).
    pub unreachable_reverse: Vec<CountryId>,
}

impl ConnectivityReport {
    /// True when every country is reachable from every other. A map with
    /// zero countries is not a play surface and fails the gate.
    pub fn is_strongly_connected(&self) -> bool {
        self.countries > 0
            && self.unreachable_forward.is_empty()
            && self.unreachable_reverse.is_empty()
    }
}

impl fmt::Display for ConnectivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.countries == 0 {
            return write!(f, "the map has no countries");
        }
        if self.is_strongly_connected() {
            return write!(f, "all {} countries are mutually reachable", self.countries);
        }
        write!(
            f,
            "unreachable countries: [{}], countries with no path back: [{}]",
            join_ids(&self.unreachable_forward),
            join_ids(&self.unreachable_reverse),
        )
    }
}

fn join_ids(ids: &[CountryId]) -> String {
    ids.iter()
        .map(CountryId::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the bisected reachability check over the model's current
/// countries and adjacency mapping.
pub fn check(model: &MapModel) -> ConnectivityReport {
    let mut ids = model.country_ids();
    ids.sort_unstable();

    let Some(&start) = ids.first() else {
        return ConnectivityReport::default();
    };

    let adjacency = model.adjacency();
    let forward = reachable(start, adjacency);
    let reverse = reachable(start, &transpose(adjacency));

    ConnectivityReport {
        countries: ids.len(),
        start: Some(start),
        unreachable_forward: ids.iter().copied().filter(|id| !forward.contains(id)).collect(),
        unreachable_reverse: ids.iter().copied().filter(|id| !reverse.contains(id)).collect(),
    }
}

/// BFS over the given edge map from a start country.
fn reachable(
    start: CountryId,
    edges: &HashMap<CountryId, HashSet<CountryId>>,
) -> HashSet<CountryId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = edges.get(&current) {
            for &next in neighbors {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    visited
}

fn transpose(
    edges: &HashMap<CountryId, HashSet<CountryId>>,
) -> HashMap<CountryId, HashSet<CountryId>> {
    let mut transposed: HashMap<CountryId, HashSet<CountryId>> = HashMap::new();
    for (&from, tos) in edges {
        for &to in tos {
            transposed.entry(to).or_default().insert(from);
        }
    }
    transposed
}
