use std::collections::HashSet;

use blake3::Hasher;
use warpgrid::programs::{self, DemoProgram};
use warpgrid::{SimulationConfig, Simulator, StepOutcome};

/// Hash of every snapshot and the final state of one run
fn run_fingerprint(program: warpgrid::Board, config: SimulationConfig) -> blake3::Hash {
    let mut sim = Simulator::new(program, config);
    let summary = sim.run();

    let mut hasher = Hasher::new();
    for fingerprint in sim.history().fingerprints() {
        hasher.update(fingerprint.as_bytes());
    }
    hasher.update(sim.board().fingerprint().as_bytes());
    hasher.update(format!("{summary:?}").as_bytes());
    hasher.finalize()
}

#[test]
fn bundled_programs_are_deterministic() {
    for demo in DemoProgram::ALL {
        let mut fingerprints = HashSet::new();
        for _ in 0..5 {
            let config = SimulationConfig::with_inputs(17, -4).max_steps(200);
            fingerprints.insert(run_fingerprint(demo.build(), config));
        }
        assert_eq!(fingerprints.len(), 1, "{demo} diverged across runs");
    }
}

#[test]
fn insertion_order_does_not_matter() {
    let forward = programs::time_warp();
    let reversed: warpgrid::Board = forward.enumerate().into_iter().rev().collect();
    assert_eq!(forward.fingerprint(), reversed.fingerprint());

    let config = SimulationConfig::with_inputs(9, 0);
    assert_eq!(
        run_fingerprint(forward, config.clone()),
        run_fingerprint(reversed, config)
    );
}

#[test]
fn stepping_matches_run() {
    let config = SimulationConfig::with_inputs(3, 4);

    let mut stepped = Simulator::new(programs::time_warp(), config.clone());
    stepped.start();
    while stepped.step() == StepOutcome::Progress {}

    let mut ran = Simulator::new(programs::time_warp(), config);
    ran.run();

    assert_eq!(stepped.board(), ran.board());
    assert_eq!(stepped.history().fingerprints(), ran.history().fingerprints());
    assert_eq!(stepped.submitted_value(), ran.submitted_value());
}
