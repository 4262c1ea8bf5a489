use anyhow::{bail, Context, Result};
use meta_core::{
    persist_tree, read_runs, ExtractError, ScenarioTree, ScenarioTreeBuilder, WellStackIndex,
};
use meta_world::{DatGeneratorSource, GridGeometry, JsonTreeWriter, ScenarioDir, Settings};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub struct ExtractOptions {
    pub output_dir: PathBuf,
    pub parallel: bool,
}

/// Builds one scenario and writes `meta_geners_<name>.json`.
pub fn extract_scenario(
    settings: &Settings,
    scenario_dir: &Path,
    geometry: Option<&GridGeometry>,
    sink: &mut JsonTreeWriter,
    parallel: bool,
) -> Result<ScenarioTree, ExtractError> {
    let name = settings.external_name(scenario_dir);
    tracing::info!(scenario = %name, dir = %scenario_dir.display(), "extracting scenario");

    let scenario = ScenarioDir::open(scenario_dir)?;
    let spec = &scenario.specification;
    let index = WellStackIndex::new(&spec.well_stacks).with_fallback(
        settings.gener_alias.clone(),
        settings.custom_grouping.clone(),
    );
    if index.is_empty() {
        tracing::warn!(scenario = %name, "scenario lists no well stack generators");
    } else {
        tracing::debug!(scenario = %name, geners = index.len(), "indexed well stack generators");
    }
    let mut builder = ScenarioTreeBuilder::new(&index, &settings.classifier, spec.date_offset);
    if let Some(geo) = geometry {
        builder = builder.with_geometry(geo);
    }

    let runs = read_runs(spec, &DatGeneratorSource::new(&scenario.root))?;
    let tree = if parallel {
        // Order-preserving collect keeps output identical to the sequential build.
        let simulations = runs
            .par_iter()
            .map(|run| builder.build_run(run))
            .collect::<Result<Vec<_>, _>>()?;
        ScenarioTree { simulations }
    } else {
        builder.build(&runs)?
    };
    persist_tree(&name, &tree, sink)?;

    let groups: usize = tree
        .simulations
        .iter()
        .map(|s| s.station_groups.len())
        .sum();
    tracing::info!(
        scenario = %name,
        simulations = tree.simulations.len(),
        station_groups = groups,
        "scenario extracted"
    );
    Ok(tree)
}

/// Extracts every configured scenario. A failed scenario is logged and
/// skipped; the call fails if any scenario failed.
pub fn run_extract(settings: &Settings, options: &ExtractOptions) -> Result<Vec<PathBuf>> {
    let geometry = settings
        .geometry
        .as_deref()
        .map(meta_world::load_geometry)
        .transpose()?;
    let mut sink = JsonTreeWriter::new(&options.output_dir);
    let mut failed = 0usize;

    for dir in &settings.dir_to_extract {
        if let Err(err) = extract_scenario(
            settings,
            dir,
            geometry.as_ref(),
            &mut sink,
            options.parallel,
        ) {
            tracing::error!(dir = %dir.display(), "scenario failed: {:#}", anyhow::Error::from(err));
            failed += 1;
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} scenarios failed",
            settings.dir_to_extract.len()
        );
    }
    Ok(sink.written().to_vec())
}

/// Copies each scenario's `scenario_spec.json` to `meta_spec_<name>.json`.
pub fn run_copy_spec(settings: &Settings, output_dir: &Path) -> Result<Vec<PathBuf>> {
    settings
        .dir_to_extract
        .iter()
        .map(|dir| {
            let name = settings.external_name(dir);
            let spec_path = meta_world::scenario::spec_path(dir);
            let target = meta_world::copy_spec(&spec_path, output_dir, &name)
                .with_context(|| format!("scenario '{name}'"))?;
            tracing::info!(scenario = %name, path = %target.display(), "copied scenario spec");
            Ok(target)
        })
        .collect()
}
