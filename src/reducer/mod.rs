//! One synchronous tick over a frozen board
//!
//! All operators are evaluated against the same unmodified snapshot. Their
//! scheduled effects are conflict-checked as a whole before anything is
//! applied, so a tick either succeeds completely or changes nothing.

mod operators;

pub use operators::apply_arithmetic;

use crate::board::{Board, CellValue, Coord};
use crate::TickError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Time-warp event emitted by an `@` operator
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWarp {
    /// Position of the `@` that fired
    pub emitter: Coord,
    /// Horizontal offset, subtracted from the emitter column
    pub dx: i32,
    /// Vertical offset, subtracted from the emitter row
    pub dy: i32,
    /// How many ticks to go back (at least 1)
    pub dt: i32,
    /// Value carried into the past
    pub value: CellValue,
}

impl TimeWarp {
    /// Cell of the restored board that receives the value
    ///
    /// `None` when the offset leads past the edge of the `i32` plane; the
    /// reducer never emits such a warp.
    pub fn destination(&self) -> Option<Coord> {
        Some((
            self.emitter.0.checked_sub(self.dx)?,
            self.emitter.1.checked_sub(self.dy)?,
        ))
    }
}

/// Raw effects collected while evaluating operators
#[derive(Debug, Default)]
struct Schedule {
    removes: Vec<Coord>,
    writes: Vec<(Coord, CellValue)>,
    warps: Vec<TimeWarp>,
}

impl Schedule {
    fn remove(&mut self, coord: Coord) {
        self.removes.push(coord);
    }

    fn write(&mut self, coord: Coord, value: CellValue) {
        self.writes.push((coord, value));
    }

    fn warp(&mut self, warp: TimeWarp) {
        self.warps.push(warp);
    }

    /// Conflict-check the schedule and freeze it into a [`Reduction`]
    fn finish(self) -> Result<Reduction, TickError> {
        let writes = merge_writes(self.writes)?;

        if let Some(first) = self.warps.first() {
            if let Some(other) = self.warps.iter().find(|w| w.dt != first.dt) {
                return Err(TickError::AmbiguousTimeWarp {
                    first_dt: first.dt,
                    second_dt: other.dt,
                });
            }
            merge_writes(
                self.warps
                    .iter()
                    .filter_map(|w| Some((w.destination()?, w.value))),
            )?;
        }

        Ok(Reduction {
            removes: self.removes.into_iter().collect(),
            writes,
            warps: self.warps,
        })
    }
}

/// Collapse writes per cell; identical duplicates are fine, differing ones
/// fail the tick.
fn merge_writes(
    writes: impl IntoIterator<Item = (Coord, CellValue)>,
) -> Result<BTreeMap<Coord, CellValue>, TickError> {
    let mut merged = BTreeMap::new();
    for (coord, value) in writes {
        match merged.get(&coord) {
            Some(&first) if first != value => {
                return Err(TickError::WriteConflict {
                    x: coord.0,
                    y: coord.1,
                    first,
                    second: value,
                });
            }
            Some(_) => {}
            None => {
                merged.insert(coord, value);
            }
        }
    }
    Ok(merged)
}

/// Conflict-free effects of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reduction {
    removes: BTreeSet<Coord>,
    writes: BTreeMap<Coord, CellValue>,
    warps: Vec<TimeWarp>,
}

impl Reduction {
    /// Cells cleared by this tick
    pub fn removes(&self) -> impl Iterator<Item = Coord> + '_ {
        self.removes.iter().copied()
    }

    /// Cells written by this tick, one value per cell
    pub fn writes(&self) -> impl Iterator<Item = (Coord, CellValue)> + '_ {
        self.writes.iter().map(|(&coord, &value)| (coord, value))
    }

    /// Time warps fired this tick; all share the same `dt`
    pub fn warps(&self) -> &[TimeWarp] {
        &self.warps
    }

    /// Shared `dt` of this tick's warps
    pub fn warp_dt(&self) -> Option<i32> {
        self.warps.first().map(|w| w.dt)
    }

    /// Nothing fired: no writes, removes, or warps
    pub fn is_inert(&self) -> bool {
        self.removes.is_empty() && self.writes.is_empty() && self.warps.is_empty()
    }

    /// Apply removes, then writes
    pub fn apply(&self, board: &mut Board) {
        for &(x, y) in &self.removes {
            board.remove(x, y);
        }
        for (&(x, y), &value) in &self.writes {
            board.set(x, y, value);
        }
    }
}

/// Evaluate every operator on `board` against the same snapshot
pub fn reduce(board: &Board) -> Result<Reduction, TickError> {
    let mut schedule = Schedule::default();

    for (x, y, value) in board.iter() {
        if let Some(op) = value.as_operator() {
            operators::evaluate(board, (x, y), op, &mut schedule);
        }
    }

    let reduction = schedule.finish()?;
    trace!(
        removes = reduction.removes.len(),
        writes = reduction.writes.len(),
        warps = reduction.warps.len(),
        "reduction computed"
    );
    Ok(reduction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::OperatorKind;

    fn op(kind: OperatorKind) -> CellValue {
        CellValue::Operator(kind)
    }

    #[test]
    fn test_operators_read_the_same_snapshot() {
        // 1 > > .  : the second `>` moves the first one, not the 1
        let board: Board = [
            (0, 0, CellValue::Integer(1)),
            (1, 0, op(OperatorKind::MoveRight)),
            (2, 0, op(OperatorKind::MoveRight)),
        ]
        .into_iter()
        .collect();

        let reduction = reduce(&board).unwrap();
        let mut next = board.clone();
        reduction.apply(&mut next);

        assert_eq!(next.get(0, 0), CellValue::Empty);
        assert_eq!(next.get(1, 0), CellValue::Empty);
        assert_eq!(next.get(2, 0), CellValue::Integer(1));
        assert_eq!(next.get(3, 0), op(OperatorKind::MoveRight));
    }

    #[test]
    fn test_write_wins_over_remove() {
        // 3 > 4 > .  : the middle cell is both a move source and a move target
        let board: Board = [
            (0, 0, CellValue::Integer(3)),
            (1, 0, op(OperatorKind::MoveRight)),
            (2, 0, CellValue::Integer(4)),
            (3, 0, op(OperatorKind::MoveRight)),
        ]
        .into_iter()
        .collect();

        let mut next = board.clone();
        reduce(&board).unwrap().apply(&mut next);

        assert_eq!(next.get(0, 0), CellValue::Empty);
        assert_eq!(next.get(2, 0), CellValue::Integer(3));
        assert_eq!(next.get(4, 0), CellValue::Integer(4));
    }

    #[test]
    fn test_identical_writes_do_not_conflict() {
        // 5 > . < 5
        let board: Board = [
            (0, 0, CellValue::Integer(5)),
            (1, 0, op(OperatorKind::MoveRight)),
            (3, 0, op(OperatorKind::MoveLeft)),
            (4, 0, CellValue::Integer(5)),
        ]
        .into_iter()
        .collect();

        let reduction = reduce(&board).unwrap();
        assert_eq!(
            reduction.writes().collect::<Vec<_>>(),
            vec![((2, 0), CellValue::Integer(5))]
        );
    }

    #[test]
    fn test_conflicting_writes_fail_the_tick() {
        // 5 > . < 6
        let board: Board = [
            (0, 0, CellValue::Integer(5)),
            (1, 0, op(OperatorKind::MoveRight)),
            (3, 0, op(OperatorKind::MoveLeft)),
            (4, 0, CellValue::Integer(6)),
        ]
        .into_iter()
        .collect();

        assert!(matches!(
            reduce(&board),
            Err(TickError::WriteConflict { x: 2, y: 0, .. })
        ));
    }

    #[test]
    fn test_inert_board() {
        let board: Board = [
            (0, 0, CellValue::Integer(5)),
            (1, 1, op(OperatorKind::Add)),
            (2, 2, CellValue::OutputMarker),
        ]
        .into_iter()
        .collect();

        assert!(reduce(&board).unwrap().is_inert());
        assert!(reduce(&Board::new()).unwrap().is_inert());
    }

    #[test]
    fn test_time_warp_consumes_operands() {
        //  .  9  .
        //  1  @  2
        //  .  3  .
        let board: Board = [
            (1, 0, CellValue::Integer(9)),
            (0, 1, CellValue::Integer(1)),
            (1, 1, op(OperatorKind::TimeWarp)),
            (2, 1, CellValue::Integer(2)),
            (1, 2, CellValue::Integer(3)),
        ]
        .into_iter()
        .collect();

        let reduction = reduce(&board).unwrap();
        assert_eq!(
            reduction.warps(),
            &[TimeWarp {
                emitter: (1, 1),
                dx: 1,
                dy: 2,
                dt: 3,
                value: CellValue::Integer(9),
            }]
        );
        assert_eq!(reduction.warps()[0].destination(), Some((0, -1)));
        assert_eq!(reduction.removes().count(), 4);
        assert_eq!(reduction.writes().count(), 0);
    }

    #[test]
    fn test_time_warp_needs_positive_dt() {
        let board: Board = [
            (1, 0, CellValue::Integer(9)),
            (0, 1, CellValue::Integer(1)),
            (1, 1, op(OperatorKind::TimeWarp)),
            (2, 1, CellValue::Integer(2)),
            (1, 2, CellValue::Integer(0)),
        ]
        .into_iter()
        .collect();

        assert!(reduce(&board).unwrap().is_inert());
    }

    #[test]
    fn test_time_warps_with_different_dt_are_ambiguous() {
        let mut board = Board::new();
        for (ox, dt) in [(0, 1), (10, 2)] {
            board.set(ox + 1, 0, CellValue::Integer(7));
            board.set(ox, 1, CellValue::Integer(0));
            board.set(ox + 1, 1, op(OperatorKind::TimeWarp));
            board.set(ox + 2, 1, CellValue::Integer(0));
            board.set(ox + 1, 2, CellValue::Integer(dt));
        }

        assert_eq!(
            reduce(&board),
            Err(TickError::AmbiguousTimeWarp {
                first_dt: 1,
                second_dt: 2,
            })
        );
    }

    #[test]
    fn test_time_warps_into_one_cell_must_agree() {
        // Two warps with the same dt that inject different values into (0, 0)
        let mut board = Board::new();
        for (ox, value) in [(0, 7), (10, 8)] {
            board.set(ox + 1, 0, CellValue::Integer(value));
            board.set(ox, 1, CellValue::Integer(ox + 1));
            board.set(ox + 1, 1, op(OperatorKind::TimeWarp));
            board.set(ox + 2, 1, CellValue::Integer(1));
            board.set(ox + 1, 2, CellValue::Integer(1));
        }

        assert!(matches!(
            reduce(&board),
            Err(TickError::WriteConflict { x: 0, y: 0, .. })
        ));
    }
}
