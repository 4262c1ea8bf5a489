//! Filesystem collaborators for `meta_core`: settings, scenario directories,
//! GENER block reading, grid geometry, and JSON output.

pub mod gener_dat;
pub mod geometry;
pub mod persist;
pub mod scenario;
pub mod settings;

pub use gener_dat::{parse_geners, read_geners, DatError, DatGeneratorSource};
pub use geometry::{load_geometry, GridGeometry};
pub use persist::{copy_spec, JsonTreeWriter};
pub use scenario::{load_spec, ScenarioDir};
pub use settings::{load_settings, Settings};
