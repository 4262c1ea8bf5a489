use anyhow::{bail, Context, Result};
use meta_core::{CustomGrouping, GenerAliases, TagClassifier};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extraction settings, read from `settings.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Scenario directories, each holding a `scenario_spec.json`.
    pub dir_to_extract: Vec<PathBuf>,
    #[serde(default)]
    pub gener_alias: GenerAliases,
    #[serde(default)]
    pub custom_grouping: CustomGrouping,
    /// Grid geometry JSON; elevations are omitted without it.
    #[serde(default)]
    pub geometry: Option<PathBuf>,
    #[serde(default)]
    pub external_scenario_names: HashMap<String, String>,
    #[serde(default)]
    pub classifier: TagClassifier,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Settings {
    /// Name a scenario directory is published under.
    ///
    /// Dash-separated basenames are mapped token by token; any other
    /// basename is mapped whole. Unmapped parts are kept as they are.
    pub fn external_name(&self, scenario_dir: &Path) -> String {
        let base = scenario_basename(scenario_dir);
        let lookup = |token: &str| {
            self.external_scenario_names
                .get(token)
                .cloned()
                .unwrap_or_else(|| token.to_string())
        };
        if base.contains('-') {
            base.split('-').map(lookup).collect::<Vec<_>>().join("-")
        } else {
            lookup(base.as_str())
        }
    }

    /// Relative paths in the settings file are taken relative to it.
    fn resolve_paths(&mut self, base: &Path) {
        for dir in &mut self.dir_to_extract {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        if let Some(geometry) = &mut self.geometry {
            if geometry.is_relative() {
                *geometry = base.join(&*geometry);
            }
        }
    }
}

/// Last component of a directory path, ignoring trailing separators and `.`.
pub fn scenario_basename(dir: &Path) -> String {
    dir.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .next_back()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings file: {}", path.display()))?;
    let mut settings: Settings = serde_json::from_str(&json)
        .with_context(|| format!("parsing settings file: {}", path.display()))?;
    if settings.dir_to_extract.is_empty() {
        bail!("settings 'dir_to_extract' must list at least one scenario directory");
    }
    if let Some(base) = path.parent() {
        settings.resolve_paths(base);
    }
    Ok(settings)
}
