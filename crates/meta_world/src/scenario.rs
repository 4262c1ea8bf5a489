use meta_core::{ScenarioSpec, SpecificationError};
use std::path::{Path, PathBuf};

pub const SPEC_FILENAME: &str = "scenario_spec.json";

const REQUIRED_KEYS: &[&str] = &["simulations", "date_offset", "well_stacks"];

/// A scenario directory: `scenario_spec.json` plus one input file per simulation.
#[derive(Debug, Clone)]
pub struct ScenarioDir {
    pub root: PathBuf,
    pub specification: ScenarioSpec,
}

impl ScenarioDir {
    pub fn open(root: &Path) -> Result<Self, SpecificationError> {
        let specification = load_spec(&spec_path(root))?;
        Ok(Self {
            root: root.to_path_buf(),
            specification,
        })
    }
}

pub fn spec_path(root: &Path) -> PathBuf {
    root.join(SPEC_FILENAME)
}

pub fn dat_path(root: &Path, filename: &str) -> PathBuf {
    root.join(format!("{filename}.dat"))
}

/// Loads and checks a scenario specification.
pub fn load_spec(path: &Path) -> Result<ScenarioSpec, SpecificationError> {
    if !path.exists() {
        return Err(SpecificationError::Missing(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path).map_err(|source| SpecificationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = |source| SpecificationError::Malformed {
        path: path.to_path_buf(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(&json).map_err(malformed)?;
    for &key in REQUIRED_KEYS {
        if value.get(key).is_none() {
            return Err(SpecificationError::MissingKey {
                path: path.to_path_buf(),
                key,
            });
        }
    }
    serde_json::from_value(value).map_err(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meta_core::TimeValue;

    fn write_spec(dir: &Path, json: &str) {
        std::fs::write(dir.join(SPEC_FILENAME), json).unwrap();
    }

    const SPEC: &str = r#"{
        "date_offset": 1990.0,
        "simulations": [
            {"filename": "pr_a", "aut2_tstart_sec": 0.0, "aut2_tstop_sec": 3.15576e8},
            {"filename": "pr_b", "aut2_tstart_sec": [0.0, 1.0], "aut2_tstop_sec": 6.31152e8}
        ],
        "well_stacks": {
            "S1": {"geners": {"W1": [["abc12", "prd01"]], "W2": [["abd13", "prd02"]]}},
            "S0": {"geners": {}}
        },
        "notes": "ignored"
    }"#;

    #[test]
    fn test_open_scenario_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_spec(dir.path(), SPEC);
        let scenario = ScenarioDir::open(dir.path()).unwrap();
        let spec = &scenario.specification;
        assert!((spec.date_offset - 1990.0).abs() < f64::EPSILON);
        assert_eq!(spec.simulations.len(), 2);
        assert_eq!(spec.simulations[1].tstart_sec, TimeValue::Series(vec![0.0, 1.0]));
        let stacks: Vec<&String> = spec.well_stacks.keys().collect();
        assert_eq!(stacks, vec!["S1", "S0"]);
        assert_eq!(scenario.root, dir.path());
        assert_eq!(
            dat_path(&scenario.root, &spec.simulations[0].filename),
            dir.path().join("pr_a.dat")
        );
    }

    #[test]
    fn test_missing_spec() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioDir::open(dir.path()).unwrap_err();
        assert!(matches!(err, SpecificationError::Missing(_)));
    }

    #[test]
    fn test_missing_required_key() {
        let dir = tempfile::tempdir().unwrap();
        write_spec(dir.path(), r#"{"date_offset": 0.0, "simulations": []}"#);
        let err = ScenarioDir::open(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            SpecificationError::MissingKey {
                key: "well_stacks",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_spec() {
        let dir = tempfile::tempdir().unwrap();
        write_spec(dir.path(), "{ not json");
        assert!(matches!(
            ScenarioDir::open(dir.path()).unwrap_err(),
            SpecificationError::Malformed { .. }
        ));

        write_spec(
            dir.path(),
            r#"{"date_offset": "soon", "simulations": [], "well_stacks": {}}"#,
        );
        assert!(matches!(
            ScenarioDir::open(dir.path()).unwrap_err(),
            SpecificationError::Malformed { .. }
        ));
    }
}
