//! Scenario tree assembly.
//!
//! Drives a [`StationGroupAccumulator`] over each simulation's generator
//! stream, annotates the emitted groups with well/stack identity and
//! elevation, and collects one [`SimulationEntry`] per simulation.

use crate::error::{BoxError, ExtractError, StructuralError};
use crate::station::StationGroupAccumulator;
use crate::units::to_years;
use crate::{
    GenerAliases, GenerEntry, GenerId, Generator, RoleClassifier, ScenarioSpec, ScenarioTree,
    SimulationEntry, SimulationRun, SimulationSpec, StationGroup, StationGroupReport,
    WellStackIndex,
};

/// Block → elevation of the block centre.
pub trait Geometry: Send + Sync {
    fn elevation(&self, block: &str) -> Option<f64>;
}

/// Supplies the generator stream of one simulation, in source order.
pub trait GeneratorSource {
    fn generators(&self, simulation: &SimulationSpec) -> Result<Vec<Generator>, BoxError>;
}

/// Receives the finished tree of one scenario.
pub trait TreeSink {
    fn persist(&mut self, scenario_name: &str, tree: &ScenarioTree) -> Result<(), BoxError>;
}

pub struct ScenarioTreeBuilder<'a> {
    index: &'a WellStackIndex,
    classifier: &'a dyn RoleClassifier,
    date_offset: f64,
    geometry: Option<&'a dyn Geometry>,
}

impl<'a> ScenarioTreeBuilder<'a> {
    pub fn new(
        index: &'a WellStackIndex,
        classifier: &'a dyn RoleClassifier,
        date_offset: f64,
    ) -> Self {
        Self {
            index,
            classifier,
            date_offset,
            geometry: None,
        }
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: &'a dyn Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Partitions a generator stream into valid station groups, in stream order.
    pub fn partition(&self, generators: &[Generator]) -> Result<Vec<StationGroup>, StructuralError> {
        let mut groups = Vec::new();
        let mut acc = StationGroupAccumulator::new(self.classifier);
        for gener in generators {
            acc.add(gener)?;
            if !acc.is_closed() {
                continue;
            }
            let done = std::mem::replace(&mut acc, StationGroupAccumulator::new(self.classifier));
            let members = done.len();
            match done.dump() {
                Some(group) => groups.push(group),
                None => tracing::warn!(
                    closing = %gener.id(),
                    members,
                    "discarding station group closed without a control generator"
                ),
            }
        }
        if !acc.is_empty() {
            tracing::debug!(
                trailing = acc.len(),
                "generators after the last closed station group are not grouped"
            );
        }
        Ok(groups)
    }

    pub fn build_simulation(&self, run: &SimulationRun) -> Result<SimulationEntry, StructuralError> {
        let start_year = to_years(&run.spec.tstart_sec, self.date_offset);
        let end_year = to_years(&run.spec.tstop_sec, self.date_offset);
        tracing::info!(
            simulation = %run.spec.filename,
            ?start_year,
            ?end_year,
            generators = run.generators.len(),
            "building station groups"
        );
        let station_groups = self
            .partition(&run.generators)?
            .into_iter()
            .map(|group| self.annotate(group))
            .collect();
        Ok(SimulationEntry {
            simulation: run.spec.filename.clone(),
            start_year,
            end_year,
            station_groups,
        })
    }

    /// [`Self::build_simulation`] with the failure tagged by simulation.
    pub fn build_run(&self, run: &SimulationRun) -> Result<SimulationEntry, ExtractError> {
        self.build_simulation(run)
            .map_err(|source| ExtractError::Structural {
                simulation: run.spec.filename.clone(),
                source,
            })
    }

    pub fn build<'r>(
        &self,
        runs: impl IntoIterator<Item = &'r SimulationRun>,
    ) -> Result<ScenarioTree, ExtractError> {
        let simulations = runs
            .into_iter()
            .map(|run| self.build_run(run))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScenarioTree { simulations })
    }

    /// Reads, builds, and persists one scenario. The sink is only called
    /// once every simulation has been built.
    pub fn extract(
        &self,
        scenario_name: &str,
        spec: &ScenarioSpec,
        source: &dyn GeneratorSource,
        sink: &mut dyn TreeSink,
    ) -> Result<ScenarioTree, ExtractError> {
        let runs = read_runs(spec, source)?;
        let tree = self.build(&runs)?;
        persist_tree(scenario_name, &tree, sink)?;
        Ok(tree)
    }

    fn annotate(&self, group: StationGroup) -> StationGroupReport {
        let (prd_geners, prd_wells, prd_stacks) = self.annotate_role(&group.prd_geners);
        let (inj_geners, inj_wells, inj_stacks) = self.annotate_role(&group.inj_geners);
        let control = group.control;
        let name = friendly_name(self.index.aliases(), &group.control_gener).unwrap_or(control.name);
        StationGroupReport {
            name,
            scaling: control.scaling,
            mass_target_tday: control.mass_target_tday,
            steam_target_tday: control.steam_target_tday,
            prd_geners,
            inj_geners,
            chk_geners: group.chk_geners,
            prd_wells,
            inj_wells,
            prd_stacks,
            inj_stacks,
        }
    }

    fn annotate_role(&self, geners: &[GenerId]) -> (Vec<GenerEntry>, Vec<String>, Vec<String>) {
        let mut entries = Vec::with_capacity(geners.len());
        let mut wells = Vec::new();
        let mut stacks = Vec::new();
        for gener in geners {
            let found = self.index.lookup(gener);
            if found.is_miss() {
                tracing::debug!(gener = %gener, "no well or stack for generator");
            }
            push_distinct(&mut wells, &found.well);
            push_distinct(&mut stacks, &found.stack);
            entries.push(GenerEntry {
                block: gener.block.clone(),
                name: gener.name.clone(),
                well: found.well,
                stack: found.stack,
                elevation: self.geometry.and_then(|geo| geo.elevation(&gener.block)),
            });
        }
        (entries, wells, stacks)
    }
}

/// Generator streams of every simulation in `spec`, in spec order.
pub fn read_runs(
    spec: &ScenarioSpec,
    source: &dyn GeneratorSource,
) -> Result<Vec<SimulationRun>, ExtractError> {
    spec.simulations
        .iter()
        .map(|sim| {
            let generators = source
                .generators(sim)
                .map_err(|source| ExtractError::Source {
                    simulation: sim.filename.clone(),
                    source,
                })?;
            Ok(SimulationRun {
                spec: sim.clone(),
                generators,
            })
        })
        .collect()
}

pub fn persist_tree(
    scenario_name: &str,
    tree: &ScenarioTree,
    sink: &mut dyn TreeSink,
) -> Result<(), ExtractError> {
    sink.persist(scenario_name, tree)
        .map_err(|source| ExtractError::Persist {
            scenario: scenario_name.to_string(),
            source,
        })
}

fn friendly_name(aliases: &GenerAliases, control: &GenerId) -> Option<String> {
    aliases.get(&control.name).cloned()
}

/// Appends non-empty names not already present, keeping first-occurrence order.
fn push_distinct(names: &mut Vec<String>, name: &str) {
    if !name.is_empty() && !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}
