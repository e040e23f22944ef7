pub mod types;
pub mod error;
pub mod model;
mod section;
pub mod connectivity;
pub mod format;
pub mod domination;
pub mod conquest;
pub mod loader;

pub use connectivity::ConnectivityReport;
pub use error::MapError;
pub use format::{LoadedMap, MapFormat, Section, SkippedLine};
pub use loader::LoadOutcome;
pub use model::MapModel;
pub use types::*;
