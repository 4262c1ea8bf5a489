//! Shared test fixtures for `meta_core` and downstream crates.
//!
//! Generator constructors using the default `tmk`/`chk` tags, a small
//! two-stack specification, and seeded random generator streams for
//! property-style tests.

use crate::{
    GenerAliases, GenerId, Generator, ScenarioSpec, SimulationRun, SimulationSpec, StackSpec,
    TimeValue, WellStackSpec,
};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn make_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn gener(block: &str, name: &str, gener_type: &str) -> Generator {
    Generator {
        block: block.to_string(),
        name: name.to_string(),
        gener_type: gener_type.to_string(),
        mass_target: 0.0,
        steam_target: 0.0,
        scaling: 0.0,
        flow: 0.0,
    }
}

/// A `MASS` generator; producer or injector depending on its position.
pub fn member(block: &str, name: &str) -> Generator {
    gener(block, name, "MASS")
}

pub fn control(block: &str, name: &str, mass: f64, steam: f64, scaling: f64) -> Generator {
    Generator {
        mass_target: mass,
        steam_target: steam,
        scaling,
        ..gener(block, name, "TMAK")
    }
}

pub fn check(block: &str, name: &str, flow: f64) -> Generator {
    Generator {
        flow,
        ..gener(block, name, "FINJ")
    }
}

pub fn id(block: &str, name: &str) -> GenerId {
    GenerId::new(block, name)
}

/// Stack `S1` with wells `W1` (`prd01`) and `W2` (`prd02`, `prd03`);
/// stack `S2` with well `W3` (`inj01`).
pub fn two_stack_spec() -> WellStackSpec {
    let mut s1 = StackSpec::default();
    s1.geners
        .insert("W1".to_string(), vec![id("abc12", "prd01")]);
    s1.geners.insert(
        "W2".to_string(),
        vec![id("abd13", "prd02"), id("abe14", "prd03")],
    );
    let mut s2 = StackSpec::default();
    s2.geners
        .insert("W3".to_string(), vec![id("bcd21", "inj01")]);
    IndexMap::from([("S1".to_string(), s1), ("S2".to_string(), s2)])
}

pub fn scenario_spec(simulations: &[&str]) -> ScenarioSpec {
    ScenarioSpec {
        date_offset: 1990.0,
        simulations: simulations
            .iter()
            .map(|name| SimulationSpec {
                filename: (*name).to_string(),
                tstart_sec: TimeValue::Scalar(0.0),
                tstop_sec: TimeValue::Scalar(crate::units::SECONDS_PER_YEAR * 10.0),
            })
            .collect(),
        well_stacks: two_stack_spec(),
    }
}

pub fn aliases(pairs: &[(&str, &str)]) -> GenerAliases {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// One complete station: two producers, control, one injector, zero-flow
/// check, closing check. Names are suffixed with `tag`.
pub fn station_stream(tag: &str) -> Vec<Generator> {
    vec![
        member("abc12", "prd01"),
        member("abd13", "prd02"),
        control("tmk01", &format!("tmk{tag}"), 10.0, 5.0, -2.0),
        member("bcd21", "inj01"),
        check("chk01", &format!("chkA{tag}"), 0.0),
        check("chk02", &format!("chkB{tag}"), 5.0),
    ]
}

pub fn simulation_run(filename: &str, generators: Vec<Generator>) -> SimulationRun {
    SimulationRun {
        spec: SimulationSpec {
            filename: filename.to_string(),
            tstart_sec: TimeValue::Scalar(0.0),
            tstop_sec: TimeValue::Scalar(crate::units::SECONDS_PER_YEAR * 10.0),
        },
        generators,
    }
}

/// A random stream of uniquely named generators mixing members, controls,
/// and zero/nonzero checks. Not guaranteed to be structurally valid.
pub fn random_stream(rng: &mut impl Rng, len: usize) -> Vec<Generator> {
    (0..len)
        .map(|i| {
            let block = format!("b{:04}", rng.gen_range(0..100));
            match rng.gen_range(0..10) {
                0 => control(&block, &format!("tmk{i:02}"), 1.0, 1.0, -0.5),
                1 | 2 => {
                    let flow = if rng.gen_bool(0.5) { 1.0 } else { 0.0 };
                    check(&block, &format!("chk{i:02}"), flow)
                }
                _ => member(&block, &format!("g{i:04}")),
            }
        })
        .collect()
}
