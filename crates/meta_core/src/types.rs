//! Type definitions for `meta_core`.
//!
//! Generator records as read from a simulation input, the scenario
//! specification, and the report types written per scenario.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Generator identity and records
// ---------------------------------------------------------------------------

/// A generator identifier: the (block, name) pair. Serialized as `[block, name]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct GenerId {
    pub block: String,
    pub name: String,
}

impl GenerId {
    pub fn new(block: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            name: name.into(),
        }
    }
}

impl From<(String, String)> for GenerId {
    fn from((block, name): (String, String)) -> Self {
        Self { block, name }
    }
}

impl From<GenerId> for (String, String) {
    fn from(id: GenerId) -> Self {
        (id.block, id.name)
    }
}

impl std::fmt::Display for GenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.block, self.name)
    }
}

/// One generator record of a simulation input, read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub block: String,
    pub name: String,
    /// Four-character type tag, e.g. `TMAK`, `FINJ`, `MASS`.
    #[serde(rename = "type")]
    pub gener_type: String,
    /// First target field (`GX`), kg/s.
    #[serde(alias = "gx", default)]
    pub mass_target: f64,
    /// Second target field (`EX`), kg/s.
    #[serde(alias = "ex", default)]
    pub steam_target: f64,
    /// Scaling magnitude (`HG`); only meaningful on control generators.
    #[serde(alias = "hg", default)]
    pub scaling: f64,
    /// Flow field (`FG`); a nonzero value on a check generator closes a group.
    #[serde(alias = "fg", default)]
    pub flow: f64,
}

impl Generator {
    pub fn id(&self) -> GenerId {
        GenerId::new(self.block.clone(), self.name.clone())
    }
}

/// Role of a generator within a station group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerRole {
    Control,
    Check,
    Other,
}

// ---------------------------------------------------------------------------
// Station group records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scaling {
    Uniform,
    Progressive,
}

impl Scaling {
    /// `None` for a non-negative magnitude, `Uniform` in (-1, 0), `Progressive` at -1 and below.
    pub fn from_magnitude(magnitude: f64) -> Option<Self> {
        if magnitude.is_nan() || magnitude >= 0.0 {
            None
        } else if magnitude > -1.0 {
            Some(Scaling::Uniform)
        } else {
            Some(Scaling::Progressive)
        }
    }
}

/// Fields derived from a group's control generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSummary {
    pub name: String,
    pub scaling: Option<Scaling>,
    pub mass_target_tday: f64,
    pub steam_target_tday: f64,
}

/// An emitted station group, before well/stack annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationGroup {
    /// The control generator's own name, kept for alias lookup.
    #[serde(skip)]
    pub control_gener: GenerId,
    #[serde(flatten)]
    pub control: ControlSummary,
    pub prd_geners: Vec<GenerId>,
    pub inj_geners: Vec<GenerId>,
    pub chk_geners: Vec<GenerId>,
}

// ---------------------------------------------------------------------------
// Scenario specification
// ---------------------------------------------------------------------------

/// A time in seconds, or a series of times. Converted element-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Scalar(f64),
    Series(Vec<f64>),
}

impl TimeValue {
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            TimeValue::Scalar(x) => TimeValue::Scalar(f(*x)),
            TimeValue::Series(xs) => TimeValue::Series(xs.iter().map(|&x| f(x)).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSpec {
    pub filename: String,
    #[serde(rename = "aut2_tstart_sec")]
    pub tstart_sec: TimeValue,
    #[serde(rename = "aut2_tstop_sec")]
    pub tstop_sec: TimeValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackSpec {
    /// Well name → generator identifiers, in declaration order.
    pub geners: IndexMap<String, Vec<GenerId>>,
}

/// Stack name → stack, in declaration order.
pub type WellStackSpec = IndexMap<String, StackSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub date_offset: f64,
    pub simulations: Vec<SimulationSpec>,
    pub well_stacks: WellStackSpec,
}

/// Generator name → friendly label.
pub type GenerAliases = HashMap<String, String>;

/// Group label → member names, in declaration order.
pub type CustomGrouping = IndexMap<String, Vec<String>>;

/// A simulation ready for extraction: its spec entry plus its generator stream.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub spec: SimulationSpec,
    pub generators: Vec<Generator>,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A producer or injector annotated with its well and stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerEntry {
    pub block: String,
    pub name: String,
    pub well: String,
    pub stack: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationGroupReport {
    pub name: String,
    pub scaling: Option<Scaling>,
    pub mass_target_tday: f64,
    pub steam_target_tday: f64,
    pub prd_geners: Vec<GenerEntry>,
    pub inj_geners: Vec<GenerEntry>,
    pub chk_geners: Vec<GenerId>,
    pub prd_wells: Vec<String>,
    pub inj_wells: Vec<String>,
    pub prd_stacks: Vec<String>,
    pub inj_stacks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub simulation: String,
    pub start_year: TimeValue,
    pub end_year: TimeValue,
    pub station_groups: Vec<StationGroupReport>,
}

/// The per-scenario document: simulation entries in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioTree {
    pub simulations: Vec<SimulationEntry>,
}
