//! Send a value into the past and watch the timeline get rewritten.

use warpgrid::programs;
use warpgrid::{SimulationConfig, Simulator};

fn main() -> anyhow::Result<()> {
    let input = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<i32>())
        .transpose()?
        .unwrap_or(42);

    let config = SimulationConfig::with_inputs(input, 0);
    config.validate()?;

    let mut sim = Simulator::new(programs::time_warp(), config);
    let summary = sim.run();

    for (tick, board) in sim.history().iter().enumerate() {
        println!("snapshot {}:\n{}", tick + 1, board.render());
    }
    println!("final board:\n{}", sim.board().render());
    println!(
        "{} after {} steps (tick {}), submitted {:?}",
        summary.outcome, summary.steps, summary.ticks, summary.submitted
    );
    println!("{}", sim.spacetime_profile().report());
    Ok(())
}
