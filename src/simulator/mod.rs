//! Simulation lifecycle
//!
//! [`Simulator`] owns the program, the live board and the timeline. Hosts
//! edit the program while no run is active, then drive the run one
//! [`Simulator::step`] at a time (or all at once with [`Simulator::run`]).
//!
//! ```text
//!            start()                 submission / deadlock / limits
//!   Idle ───────────▶ Running ───────────────────────────▶ HaltedNormal
//!    ▲   ◀─────────── │    │                                  │
//!    │      stop()    │    └── tick error ──▶ HaltedError     │
//!    └──────────── reset() / set_inputs() / edits ◀───────────┘
//! ```

use crate::board::{integer_in_range, Board, CellValue, InputPort, INTEGER_MAX, INTEGER_MIN};
use crate::history::{History, TimeTravel};
use crate::reducer::reduce;
use crate::space::{self, SpacetimeProfile};
use crate::submission::SubmissionDetector;
use crate::{EditError, SimulationConfig, TickError};
use std::fmt;
use tracing::{debug, trace, warn};

/// Why a run stopped without error
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// An output marker was overwritten with this value
    Submitted(CellValue),
    /// No operator can fire on the current board
    Deadlock,
    /// The tick counter reached `max_ticks`
    MaxTicksExceeded,
    /// `max_steps` steps ran since `start()`
    StepBudgetExhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Submitted(value) => write!(f, "submitted {value}"),
            HaltReason::Deadlock => f.write_str("no operator can fire"),
            HaltReason::MaxTicksExceeded => f.write_str("tick limit reached"),
            HaltReason::StepBudgetExhausted => f.write_str("step budget exhausted"),
        }
    }
}

/// Lifecycle state
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationState {
    /// Not running; the program may be edited
    Idle,
    /// `step()` advances the simulation
    Running,
    /// Stopped on its own
    HaltedNormal(HaltReason),
    /// Stopped by a failed tick; the board is the last valid one
    HaltedError(TickError),
}

/// Result of one [`Simulator::step`] call
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A tick completed and the run continues
    Progress,
    /// Nothing happened: not running, or a result was already submitted
    NoProgress,
    /// This step halted the run normally
    Halted(HaltReason),
    /// This step failed; the board is unchanged
    Failed(TickError),
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Progress => f.write_str("progress"),
            StepOutcome::NoProgress => f.write_str("no progress"),
            StepOutcome::Halted(reason) => write!(f, "halted: {reason}"),
            StepOutcome::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Result of [`Simulator::run`]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Outcome of the last step
    pub outcome: StepOutcome,
    /// Tick counter at the end of the run
    pub ticks: usize,
    /// Steps executed
    pub steps: usize,
    /// Submitted value, if any
    pub submitted: Option<CellValue>,
    /// Spacetime volume of the final timeline
    pub spacetime_volume: u64,
}

impl RunSummary {
    /// Submitted integer, if the result is one
    pub fn submitted_integer(&self) -> Option<i32> {
        self.submitted.and_then(|value| value.as_integer())
    }
}

/// Simulation controller
///
/// Owns the program, the live board, the timeline and the run state.
/// Hosts only ever receive shared borrows of the boards.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,

    /// Program as edited, with `A` / `B` placeholders
    program: Board,

    /// Live board; differs from the latest snapshot only by substituted
    /// inputs before the first tick and by a committed submission
    board: Board,

    history: History,
    detector: SubmissionDetector,

    /// Current tick, starting at 1
    tick: usize,

    /// Steps executed since `start()`
    steps: usize,

    state: SimulationState,
    submitted: Option<CellValue>,
}

impl Simulator {
    /// Create a simulator for `program`
    ///
    /// Inputs outside [-99, 99] are clamped into range.
    pub fn new(program: Board, mut config: SimulationConfig) -> Self {
        if config.validate().is_err() {
            warn!(
                input_a = config.input_a,
                input_b = config.input_b,
                "inputs clamped into cell range"
            );
            config.input_a = config.input_a.clamp(INTEGER_MIN, INTEGER_MAX);
            config.input_b = config.input_b.clamp(INTEGER_MIN, INTEGER_MAX);
        }

        debug!(cells = program.len(), "simulator created");
        Self {
            config,
            board: program.clone(),
            history: History::new(program.clone()),
            detector: SubmissionDetector::new(&program),
            program,
            tick: 1,
            steps: 0,
            state: SimulationState::Idle,
            submitted: None,
        }
    }

    /// Substitute inputs and begin running
    ///
    /// Returns `false` if the simulation is already running or halted on an
    /// error; `reset()` first in that case.
    pub fn start(&mut self) -> bool {
        match self.state {
            SimulationState::Idle | SimulationState::HaltedNormal(_) => {}
            SimulationState::Running | SimulationState::HaltedError(_) => return false,
        }

        // Only the live board is substituted; snapshots keep the placeholders
        let replaced = self.substitute_inputs();

        debug!(
            tick = self.tick,
            replaced,
            input_a = self.config.input_a,
            input_b = self.config.input_b,
            "simulation started"
        );
        self.steps = 0;
        self.state = SimulationState::Running;
        true
    }

    fn substitute_inputs(&mut self) -> usize {
        let bindings = [
            (InputPort::A, self.config.input_a),
            (InputPort::B, self.config.input_b),
        ];
        bindings
            .into_iter()
            .map(|(port, value)| {
                self.board
                    .replace_all(CellValue::Input(port), CellValue::Integer(value))
            })
            .sum()
    }

    /// Execute one tick
    ///
    /// Never panics and never leaves a partially applied tick behind.
    pub fn step(&mut self) -> StepOutcome {
        if self.state != SimulationState::Running || self.submitted.is_some() {
            return StepOutcome::NoProgress;
        }
        if self.tick >= self.config.max_ticks {
            return self.halt(HaltReason::MaxTicksExceeded);
        }
        if self.steps >= self.config.max_steps {
            return self.halt(HaltReason::StepBudgetExhausted);
        }

        self.steps += 1;
        match self.advance() {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(tick = self.tick, error = %err, "tick failed");
                self.state = SimulationState::HaltedError(err.clone());
                StepOutcome::Failed(err)
            }
        }
    }

    fn advance(&mut self) -> Result<StepOutcome, TickError> {
        let reduction = reduce(&self.board)?;

        let mut next = self.board.clone();
        reduction.apply(&mut next);

        // Submission is judged on the post-reduction board, before any warp
        if let Some(value) = self.detector.check(&next)? {
            self.board = next;
            self.submitted = Some(value);
            return Ok(self.halt(HaltReason::Submitted(value)));
        }

        if let Some(warp) = TimeTravel::new(&mut self.history).apply(self.tick, reduction.warps()) {
            self.board = warp.board;
            self.tick = warp.resume_tick;
        } else {
            self.history.push(next.clone());
            self.board = next;
            self.tick += 1;
        }
        trace!(tick = self.tick, cells = self.board.len(), "tick complete");

        match reduce(&self.board) {
            Ok(probe) if probe.is_inert() => Ok(self.halt(HaltReason::Deadlock)),
            Ok(_) => Ok(StepOutcome::Progress),
            Err(err) => {
                // Surfaces as a failed tick on the next step
                trace!(error = %err, "next tick will fail");
                Ok(StepOutcome::Progress)
            }
        }
    }

    fn halt(&mut self, reason: HaltReason) -> StepOutcome {
        debug!(tick = self.tick, steps = self.steps, %reason, "simulation halted");
        self.state = SimulationState::HaltedNormal(reason);
        StepOutcome::Halted(reason)
    }

    /// Start and step until the run halts
    pub fn run(&mut self) -> RunSummary {
        self.start();
        let outcome = loop {
            match self.step() {
                StepOutcome::Progress => continue,
                other => break other,
            }
        };

        RunSummary {
            outcome,
            ticks: self.tick,
            steps: self.steps,
            submitted: self.submitted,
            spacetime_volume: self.spacetime_volume(),
        }
    }

    /// Pause a running simulation
    pub fn stop(&mut self) {
        if self.state == SimulationState::Running {
            debug!(tick = self.tick, "simulation stopped");
            self.state = SimulationState::Idle;
        }
    }

    /// Restore the program and discard the run
    pub fn reset(&mut self) {
        self.board = self.program.clone();
        self.history.reset(self.program.clone());
        self.detector = SubmissionDetector::new(&self.program);
        self.tick = 1;
        self.steps = 0;
        self.submitted = None;
        self.state = SimulationState::Idle;
        debug!(cells = self.program.len(), "simulation reset");
    }

    /// Bind new inputs and reset
    pub fn set_inputs(&mut self, input_a: i32, input_b: i32) -> Result<(), EditError> {
        let config = SimulationConfig {
            input_a,
            input_b,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), EditError> {
        if self.state == SimulationState::Running {
            return Err(EditError::SimulationRunning);
        }
        Ok(())
    }

    /// Edit one program cell and reset
    pub fn set_cell(&mut self, x: i32, y: i32, value: CellValue) -> Result<(), EditError> {
        self.ensure_editable()?;
        if let CellValue::Integer(n) = value {
            if !integer_in_range(n) {
                return Err(EditError::IntegerOutOfRange(i64::from(n)));
            }
        }
        self.program.set(x, y, value);
        self.reset();
        Ok(())
    }

    /// Edit one program cell from its token text and reset
    pub fn set_token(&mut self, x: i32, y: i32, token: &str) -> Result<(), EditError> {
        let value = token.parse()?;
        self.set_cell(x, y, value)
    }

    /// Erase the program and reset
    pub fn clear(&mut self) -> Result<(), EditError> {
        self.ensure_editable()?;
        self.program.clear();
        self.reset();
        Ok(())
    }

    /// Cell of the live board
    pub fn get_cell(&self, x: i32, y: i32) -> CellValue {
        self.board.get(x, y)
    }

    /// Live board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Program as edited, placeholders intact
    pub fn program(&self) -> &Board {
        &self.program
    }

    /// Recorded timeline
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current tick
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Steps executed since `start()`
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Whether `step()` advances the simulation
    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    /// Lifecycle state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Submitted value, if any
    pub fn submitted_value(&self) -> Option<CellValue> {
        self.submitted
    }

    /// Bound inputs `(A, B)`
    pub fn inputs(&self) -> (i32, i32) {
        (self.config.input_a, self.config.input_b)
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spacetime volume of the recorded timeline
    pub fn spacetime_volume(&self) -> u64 {
        space::spacetime_volume(&self.history)
    }

    /// Spacetime breakdown of the recorded timeline
    pub fn spacetime_profile(&self) -> SpacetimeProfile {
        SpacetimeProfile::measure(&self.history)
    }
}
