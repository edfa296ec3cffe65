//! Build a small program by hand and step it to completion.

use warpgrid::{Simulator, SimulationConfig, StepOutcome};

fn main() -> anyhow::Result<()> {
    // .  B
    // A  *  >  .  S
    let mut sim = Simulator::new(Default::default(), SimulationConfig::with_inputs(6, 7));
    for (x, y, token) in [(1, 0, "B"), (0, 1, "A"), (1, 1, "*"), (3, 1, ">"), (5, 1, "S")] {
        sim.set_token(x, y, token)?;
    }

    println!("program:\n{}", sim.program().render());
    sim.start();

    loop {
        let outcome = sim.step();
        println!("tick {}:\n{}", sim.tick(), sim.board().render());
        if outcome != StepOutcome::Progress {
            println!("{outcome}");
            break;
        }
    }

    println!("submitted: {:?}", sim.submitted_value());
    println!("spacetime volume: {}", sim.spacetime_volume());
    Ok(())
}
