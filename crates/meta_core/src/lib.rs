//! `meta_core`: station group extraction from simulation generator lists.
//!
//! No IO. Generator streams, geometry, and persistence come in through the
//! traits in [`tree`].

mod classify;
pub mod error;
pub mod station;
pub mod tree;
mod types;
pub mod units;
mod well_stack;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use classify::{RoleClassifier, RoleTag, TagClassifier};
pub use error::{BoxError, ExtractError, SpecificationError, StructuralError};
pub use station::{AddOutcome, GroupState, StationGroupAccumulator};
pub use tree::{persist_tree, read_runs, Geometry, GeneratorSource, ScenarioTreeBuilder, TreeSink};
pub use types::*;
pub use well_stack::{WellMatch, WellStackIndex};
