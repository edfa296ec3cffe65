//! Bundled demo programs
//!
//! Small programs used by the CLI, the benches and the docs. Each builder
//! returns a fresh program board with its placeholders intact.

use crate::board::{Board, CellValue, InputPort, OperatorKind};
use std::fmt;
use std::str::FromStr;

const A: CellValue = CellValue::Input(InputPort::A);
const B: CellValue = CellValue::Input(InputPort::B);
const S: CellValue = CellValue::OutputMarker;
const RIGHT: CellValue = CellValue::Operator(OperatorKind::MoveRight);
const ADD: CellValue = CellValue::Operator(OperatorKind::Add);
const WARP: CellValue = CellValue::Operator(OperatorKind::TimeWarp);

fn program(cells: &[(i32, i32, CellValue)]) -> Board {
    cells.iter().copied().collect()
}

/// `A > . > S`: the input is relayed twice and submitted at tick 2
pub fn move_chain() -> Board {
    program(&[(0, 5, A), (1, 5, RIGHT), (3, 5, RIGHT), (4, 5, S)])
}

/// ```text
/// .  B
/// A  +  S
/// ```
/// Submits `A + B` at tick 1.
pub fn sum() -> Board {
    program(&[(1, 0, B), (0, 1, A), (1, 1, ADD), (2, 1, S)])
}

/// ```text
/// A  >  .  .
/// S  2  @  0
/// .  .  1  .
/// ```
/// At tick 2 the `@` sends `A` one tick back onto the output marker, which
/// submits it on the following step.
pub fn time_warp() -> Board {
    let mut board = time_loop();
    board.set(0, 4, A);
    board.set(0, 5, S);
    board
}

/// [`time_warp`] with a literal `2` and no output marker: the warp keeps
/// replaying the previous tick, so the clock gains one tick every two steps
/// and the run ends on its step budget.
pub fn time_loop() -> Board {
    program(&[
        (0, 4, CellValue::Integer(2)),
        (1, 4, RIGHT),
        (1, 5, CellValue::Integer(2)),
        (2, 5, WARP),
        (3, 5, CellValue::Integer(0)),
        (2, 6, CellValue::Integer(1)),
    ])
}

/// Named handle for a bundled program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoProgram {
    /// [`move_chain`]
    MoveChain,
    /// [`sum`]
    Sum,
    /// [`time_warp`]
    TimeWarp,
    /// [`time_loop`]
    TimeLoop,
}

impl DemoProgram {
    /// Every bundled program
    pub const ALL: [DemoProgram; 4] = [
        DemoProgram::MoveChain,
        DemoProgram::Sum,
        DemoProgram::TimeWarp,
        DemoProgram::TimeLoop,
    ];

    /// Command-line name
    pub fn name(&self) -> &'static str {
        match self {
            DemoProgram::MoveChain => "move-chain",
            DemoProgram::Sum => "sum",
            DemoProgram::TimeWarp => "time-warp",
            DemoProgram::TimeLoop => "time-loop",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            DemoProgram::MoveChain => "Relay input A across two move operators into S.",
            DemoProgram::Sum => "Submit A + B.",
            DemoProgram::TimeWarp => "Send input A one tick into the past, onto S.",
            DemoProgram::TimeLoop => "A time warp that keeps replaying the previous tick; stops on the step budget.",
        }
    }

    /// Build the program board
    pub fn build(&self) -> Board {
        match self {
            DemoProgram::MoveChain => move_chain(),
            DemoProgram::Sum => sum(),
            DemoProgram::TimeWarp => time_warp(),
            DemoProgram::TimeLoop => time_loop(),
        }
    }
}

impl fmt::Display for DemoProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoProgram {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|demo| demo.name() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|d| d.name()).collect();
                format!("unknown program '{name}' (expected one of: {})", known.join(", "))
            })
    }
}
