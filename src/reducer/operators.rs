//! Per-operator reduction rules
//!
//! Each rule reads the frozen snapshot around one operator and schedules
//! removes, writes, or a time warp. Rules never see each other's effects.

use super::{Schedule, TimeWarp};
use crate::board::{integer_in_range, Board, CellValue, Coord, Direction, OperatorKind};
use tracing::trace;

/// Evaluate the operator at `at` against `board`
pub(super) fn evaluate(board: &Board, at: Coord, op: OperatorKind, out: &mut Schedule) {
    match op {
        OperatorKind::MoveLeft
        | OperatorKind::MoveRight
        | OperatorKind::MoveUp
        | OperatorKind::MoveDown => {
            if let Some(direction) = op.direction() {
                reduce_move(board, at, direction, out);
            }
        }
        OperatorKind::Add
        | OperatorKind::Sub
        | OperatorKind::Mul
        | OperatorKind::Div
        | OperatorKind::Mod => reduce_arithmetic(board, at, op, out),
        OperatorKind::Equal => reduce_comparison(board, at, true, out),
        OperatorKind::NotEqual => reduce_comparison(board, at, false, out),
        OperatorKind::TimeWarp => reduce_time_warp(board, at, out),
    }
}

/// Adjacent cell and its content; `None` past the edge of the plane
fn neighbour(board: &Board, at: Coord, direction: Direction) -> Option<(Coord, CellValue)> {
    let coord = direction.apply(at)?;
    Some((coord, board.get(coord.0, coord.1)))
}

/// The right and below outputs of an arithmetic or comparison operator
fn outputs(at: Coord) -> Option<(Coord, Coord)> {
    Some((Direction::Right.apply(at)?, Direction::Down.apply(at)?))
}

/// `.<x -> x<.` and its rotations: the value behind the operator jumps to
/// the cell in front of it.
fn reduce_move(board: &Board, at: Coord, direction: Direction, out: &mut Schedule) {
    let (Some((source, value)), Some(target)) =
        (neighbour(board, at, direction.reverse()), direction.apply(at))
    else {
        return;
    };
    if value.is_empty() {
        return;
    }
    trace!(?at, ?source, ?target, %value, "move fired");
    out.remove(source);
    out.write(target, value);
}

/// Integer result of `x op y`, `None` when the operator must not fire
pub fn apply_arithmetic(op: OperatorKind, x: i32, y: i32) -> Option<i32> {
    let result = match op {
        OperatorKind::Add => x.checked_add(y),
        OperatorKind::Sub => x.checked_sub(y),
        OperatorKind::Mul => x.checked_mul(y),
        // Both truncate toward zero; `None` on a zero divisor
        OperatorKind::Div => x.checked_div(y),
        OperatorKind::Mod => x.checked_rem(y),
        _ => None,
    }?;
    integer_in_range(result).then_some(result)
}

/// x (left) op y (above), result written right and below
fn reduce_arithmetic(board: &Board, at: Coord, op: OperatorKind, out: &mut Schedule) {
    let (Some((left, x)), Some((above, y)), Some((right, below))) = (
        neighbour(board, at, Direction::Left),
        neighbour(board, at, Direction::Up),
        outputs(at),
    ) else {
        return;
    };
    let (Some(x), Some(y)) = (x.as_integer(), y.as_integer()) else {
        return;
    };
    let Some(result) = apply_arithmetic(op, x, y) else {
        trace!(?at, op = %op.symbol(), x, y, "degenerate arithmetic, operator idle");
        return;
    };

    trace!(?at, op = %op.symbol(), x, y, result, "arithmetic fired");
    let value = CellValue::Integer(result);
    out.remove(left);
    out.remove(above);
    out.write(right, value);
    out.write(below, value);
}

/// `=` fires on equal operands, `#` on different ones; either way the left
/// operand is passed on right and below.
fn reduce_comparison(board: &Board, at: Coord, want_equal: bool, out: &mut Schedule) {
    let (Some((left, x)), Some((above, y)), Some((right, below))) = (
        neighbour(board, at, Direction::Left),
        neighbour(board, at, Direction::Up),
        outputs(at),
    ) else {
        return;
    };
    if x.is_empty() || y.is_empty() || (x == y) != want_equal {
        return;
    }

    trace!(?at, %x, %y, want_equal, "comparison fired");
    out.remove(left);
    out.remove(above);
    out.write(right, x);
    out.write(below, x);
}

/// ```text
///  .  v  .
/// dx  @ dy
///  . dt  .
/// ```
fn reduce_time_warp(board: &Board, at: Coord, out: &mut Schedule) {
    let (Some((above, value)), Some((left, dx)), Some((right, dy)), Some((below, dt))) = (
        neighbour(board, at, Direction::Up),
        neighbour(board, at, Direction::Left),
        neighbour(board, at, Direction::Right),
        neighbour(board, at, Direction::Down),
    ) else {
        return;
    };

    if value.is_empty() {
        return;
    }
    let (Some(dx), Some(dy), Some(dt)) = (dx.as_integer(), dy.as_integer(), dt.as_integer())
    else {
        return;
    };
    if dt < 1 {
        return;
    }

    let warp = TimeWarp {
        emitter: at,
        dx,
        dy,
        dt,
        value,
    };
    if warp.destination().is_none() {
        trace!(?at, dx, dy, "time warp target off the plane, operator idle");
        return;
    }

    trace!(?at, dx, dy, dt, %value, "time warp scheduled");
    out.warp(warp);
    out.remove(above);
    out.remove(left);
    out.remove(right);
    out.remove(below);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_truncates_toward_zero() {
        assert_eq!(apply_arithmetic(OperatorKind::Div, -7, 2), Some(-3));
        assert_eq!(apply_arithmetic(OperatorKind::Mod, -7, 2), Some(-1));
        assert_eq!(apply_arithmetic(OperatorKind::Mod, 7, -2), Some(1));
    }

    #[test]
    fn test_arithmetic_degenerate_cases() {
        assert_eq!(apply_arithmetic(OperatorKind::Div, 5, 0), None);
        assert_eq!(apply_arithmetic(OperatorKind::Mod, 5, 0), None);
        // Results must fit in a cell
        assert_eq!(apply_arithmetic(OperatorKind::Mul, 50, 2), None);
        assert_eq!(apply_arithmetic(OperatorKind::Sub, -99, 1), None);
        // Not arithmetic
        assert_eq!(apply_arithmetic(OperatorKind::Equal, 1, 1), None);
    }

    fn schedule_for(board: &Board) -> Schedule {
        let mut schedule = Schedule::default();
        for (x, y, value) in board.iter() {
            if let Some(op) = value.as_operator() {
                evaluate(board, (x, y), op, &mut schedule);
            }
        }
        schedule
    }

    #[test]
    fn test_move_off_the_plane_stays_idle() {
        let board: Board = [
            (i32::MAX - 1, 0, CellValue::Integer(4)),
            (i32::MAX, 0, CellValue::Operator(OperatorKind::MoveRight)),
        ]
        .into_iter()
        .collect();

        let schedule = schedule_for(&board);
        assert!(schedule.writes.is_empty());
        assert!(schedule.removes.is_empty());
    }

    #[test]
    fn test_arithmetic_at_the_bottom_edge_stays_idle() {
        let board: Board = [
            (1, i32::MAX - 1, CellValue::Integer(2)),
            (0, i32::MAX, CellValue::Integer(3)),
            (1, i32::MAX, CellValue::Operator(OperatorKind::Add)),
        ]
        .into_iter()
        .collect();

        assert!(schedule_for(&board).writes.is_empty());
    }

    #[test]
    fn test_time_warp_aimed_off_the_plane_stays_idle() {
        //  .  9  .
        // -2  @  0
        //  .  1  .
        // with the `@` on the rightmost column: emitter_x - (-2) overflows
        let x = i32::MAX - 1;
        let board: Board = [
            (x, 0, CellValue::Integer(9)),
            (x - 1, 1, CellValue::Integer(-2)),
            (x, 1, CellValue::Operator(OperatorKind::TimeWarp)),
            (x + 1, 1, CellValue::Integer(0)),
            (x, 2, CellValue::Integer(1)),
        ]
        .into_iter()
        .collect();

        let schedule = schedule_for(&board);
        assert!(schedule.warps.is_empty());
        assert!(schedule.removes.is_empty());
    }
}
