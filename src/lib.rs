//! # warpgrid: a spatial, time-travelling grid language engine
//!
//! Programs live on an unbounded 2D grid. Each cell holds an integer, an
//! input placeholder (`A`, `B`), an output marker (`S`), or an operator.
//! Operators rewrite their neighbours one synchronous tick at a time.
//!
//! ## Execution model
//!
//! 1. **Synchronous reduction**: every operator in a tick reads the same frozen
//!    pre-tick board; conflicting writes fail the whole tick
//! 2. **Time travel**: `@` rewinds history by `dt` ticks, injects a value into
//!    the restored board, and discards the overwritten future
//! 3. **Submission**: overwriting an `S` cell produces the result and halts
//! 4. **Termination**: a board on which nothing can fire halts normally
//!
//! ## Usage Example
//!
//! ```
//! use warpgrid::{programs, SimulationConfig, Simulator};
//!
//! let config = SimulationConfig::with_inputs(3, 4);
//! let mut sim = Simulator::new(programs::sum(), config);
//! let summary = sim.run();
//! assert_eq!(summary.submitted_integer(), Some(7));
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod board;      // Sparse grid and cell tokens
pub mod reducer;    // One synchronous tick over a frozen snapshot
pub mod history;    // Snapshot timeline and time travel
pub mod submission; // Output marker watch
pub mod simulator;  // Lifecycle and step orchestration
pub mod space;      // Spacetime volume accounting
pub mod programs;   // Bundled demo programs

// Re-exports for convenience
pub use board::{token_is_valid, Board, Bounds, CellValue, Coord, InputPort, OperatorKind};
pub use history::{History, TimeTravel};
pub use reducer::{reduce, Reduction, TimeWarp};
pub use simulator::{HaltReason, RunSummary, SimulationState, Simulator, StepOutcome};
pub use space::SpacetimeProfile;
pub use submission::SubmissionDetector;

use thiserror::Error;

/// Configuration parameters for a simulation run
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Halt once the tick counter reaches this value
    pub max_ticks: usize,

    /// Halt once this many steps ran since `start()`; bounds time loops
    /// that keep rewinding the tick counter
    pub max_steps: usize,

    /// Value bound to `A`
    pub input_a: i32,

    /// Value bound to `B`
    pub input_b: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: 1_000_000,
            max_steps: 1_000_000,
            input_a: 0,
            input_b: 0,
        }
    }
}

impl SimulationConfig {
    /// Default limits with the given inputs
    pub fn with_inputs(input_a: i32, input_b: i32) -> Self {
        Self {
            input_a,
            input_b,
            ..Self::default()
        }
    }

    /// Override the tick cap
    pub fn max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Override the step budget
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Check that both inputs fit in a cell
    pub fn validate(&self) -> Result<(), EditError> {
        for input in [self.input_a, self.input_b] {
            if !board::integer_in_range(input) {
                return Err(EditError::IntegerOutOfRange(i64::from(input)));
            }
        }
        Ok(())
    }
}

/// Errors that fail a tick
///
/// A failed tick leaves the board exactly as it was before the step.
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    /// Two writes target the same cell with different values
    #[error("Write conflict at ({x}, {y}): {first} vs {second}")]
    WriteConflict {
        /// Column of the contested cell
        x: i32,
        /// Row of the contested cell
        y: i32,
        /// Value scheduled first
        first: CellValue,
        /// Conflicting value
        second: CellValue,
    },

    /// Time warps in one tick disagree on how far back to go
    #[error("Time warps to different times in the same tick: dt {first_dt} vs {second_dt}")]
    AmbiguousTimeWarp {
        /// `dt` of the first warp
        first_dt: i32,
        /// Differing `dt`
        second_dt: i32,
    },

    /// Output markers received different values in one tick
    #[error("Multiple different values submitted: {}", format_values(.values))]
    MultipleSubmissions {
        /// Distinct submitted values
        values: Vec<CellValue>,
    },
}

fn format_values(values: &[CellValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from program editing and input binding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Text is not a cell token
    #[error("Invalid token: {0:?}")]
    InvalidToken(String),

    /// Integer outside [-99, 99]
    #[error("Integer {0} outside [-99, 99]")]
    IntegerOutOfRange(i64),

    /// Programs cannot be edited mid-run
    #[error("Cannot edit the program while the simulation is running")]
    SimulationRunning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.max_ticks, 1_000_000);
        assert_eq!((config.input_a, config.input_b), (0, 0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_wide_inputs() {
        let config = SimulationConfig::with_inputs(5, 100).max_ticks(10);
        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.validate(), Err(EditError::IntegerOutOfRange(100)));
    }

    #[test]
    fn test_error_messages() {
        let err = TickError::WriteConflict {
            x: 1,
            y: 2,
            first: CellValue::Integer(3),
            second: CellValue::OutputMarker,
        };
        assert_eq!(err.to_string(), "Write conflict at (1, 2): 3 vs S");

        let err = TickError::MultipleSubmissions {
            values: vec![CellValue::Integer(1), CellValue::Integer(2)],
        };
        assert_eq!(err.to_string(), "Multiple different values submitted: 1, 2");
    }
}
