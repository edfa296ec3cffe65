use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use warpgrid::programs::DemoProgram;
use warpgrid::{SimulationConfig, Simulator, StepOutcome};

#[derive(Parser, Debug)]
#[command(name = "warpgrid", about = "Spatial, time-travelling grid language engine")]
struct Cli {
    /// Log every tick and operator (overrides RUST_LOG for this crate).
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the bundled demo programs.
    List,
    /// Run a bundled demo program to completion.
    Run {
        /// Program name (see `warpgrid list`).
        program: DemoProgram,
        /// Value bound to input A.
        #[arg(short = 'a', long, default_value_t = 0, allow_negative_numbers = true)]
        input_a: i32,
        /// Value bound to input B.
        #[arg(short = 'b', long, default_value_t = 0, allow_negative_numbers = true)]
        input_b: i32,
        /// Halt once the tick counter reaches this value.
        #[arg(long, default_value_t = 1_000_000)]
        max_ticks: usize,
        /// Halt after this many steps, even if time travel keeps the tick low.
        #[arg(long, default_value_t = 10_000)]
        max_steps: usize,
        /// Print the board after every step.
        #[arg(long)]
        show_boards: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.trace);

    match cli.command {
        Commands::List => run_list(),
        Commands::Run {
            program,
            input_a,
            input_b,
            max_ticks,
            max_steps,
            show_boards,
        } => {
            let config = SimulationConfig::with_inputs(input_a, input_b)
                .max_ticks(max_ticks)
                .max_steps(max_steps);
            run_program(program, config, show_boards)?
        }
    }

    Ok(())
}

fn init_logging(trace: bool) {
    let filter = if trace {
        EnvFilter::new("warn,warpgrid=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_list() {
    for demo in DemoProgram::ALL {
        println!("{:<12}{}", demo.name(), demo.description());
    }
}

fn run_program(program: DemoProgram, config: SimulationConfig, show_boards: bool) -> Result<()> {
    config
        .validate()
        .with_context(|| format!("invalid inputs for {program}"))?;

    let mut sim = Simulator::new(program.build(), config);
    println!("program {program}:\n{}", sim.program().render());

    sim.start();
    let outcome = loop {
        let outcome = sim.step();
        if show_boards && outcome != StepOutcome::NoProgress {
            println!("tick {}:\n{}", sim.tick(), sim.board().render());
        }
        if outcome != StepOutcome::Progress {
            break outcome;
        }
    };

    println!("result: {outcome}");
    println!("ticks: {}\tsteps: {}", sim.tick(), sim.steps());
    println!("{}", sim.spacetime_profile().report());

    if let StepOutcome::Failed(err) = outcome {
        bail!("{program} failed: {err}");
    }
    Ok(())
}
