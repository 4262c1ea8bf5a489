use anyhow::{Context, Result};
use meta_core::{BoxError, ScenarioTree, TreeSink};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn tree_filename(scenario_name: &str) -> String {
    format!("meta_geners_{scenario_name}.json")
}

pub fn spec_copy_filename(scenario_name: &str) -> String {
    format!("meta_spec_{scenario_name}.json")
}

/// Serialize with a four-space indent.
pub fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Write bytes atomically: write to `.tmp` then rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)
}

/// Writes `meta_geners_<scenario>.json` into an output directory.
#[derive(Debug, Clone)]
pub struct JsonTreeWriter {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl JsonTreeWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            written: Vec::new(),
        }
    }

    pub fn path_for(&self, scenario_name: &str) -> PathBuf {
        self.output_dir.join(tree_filename(scenario_name))
    }

    /// Documents written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl TreeSink for JsonTreeWriter {
    fn persist(&mut self, scenario_name: &str, tree: &ScenarioTree) -> Result<(), BoxError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(scenario_name);
        write_atomic(&path, &to_json_pretty(tree)?)?;
        tracing::info!(path = %path.display(), "wrote scenario tree");
        self.written.push(path);
        Ok(())
    }
}

/// Copies a scenario's raw spec to `meta_spec_<scenario>.json`.
pub fn copy_spec(spec_path: &Path, output_dir: &Path, scenario_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory: {}", output_dir.display()))?;
    let target = output_dir.join(spec_copy_filename(scenario_name));
    std::fs::copy(spec_path, &target).with_context(|| {
        format!(
            "copying {} to {}",
            spec_path.display(),
            target.display()
        )
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meta_core::{SimulationEntry, TimeValue};

    fn tree() -> ScenarioTree {
        ScenarioTree {
            simulations: vec![SimulationEntry {
                simulation: "pr_a".to_string(),
                start_year: TimeValue::Scalar(1990.0),
                end_year: TimeValue::Scalar(2000.0),
                station_groups: vec![],
            }],
        }
    }

    #[test]
    fn test_writer_names_file_after_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JsonTreeWriter::new(dir.path().join("out"));
        writer.persist("Base", &tree()).unwrap();

        let path = dir.path().join("out").join("meta_geners_Base.json");
        assert_eq!(writer.written(), [path.clone()]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"simulation\": \"pr_a\""));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["start_year"], 1990.0);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_copy_spec() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("scenario_spec.json");
        std::fs::write(&spec, r#"{"date_offset": 0}"#).unwrap();
        let target = copy_spec(&spec, &dir.path().join("out"), "Base").unwrap();
        assert!(target.ends_with("meta_spec_Base.json"));
        assert_eq!(std::fs::read_to_string(target).unwrap(), r#"{"date_offset": 0}"#);
    }
}
