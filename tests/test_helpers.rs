//! Test helper functions for building programs

#![allow(dead_code)]
use warpgrid::{Board, CellValue, OperatorKind};

/// Build a board from rows of whitespace-separated tokens
///
/// The first token of the first row lands on `origin`; `.` leaves a cell empty.
pub fn grid(origin: (i32, i32), rows: &[&str]) -> Board {
    let mut board = Board::new();
    for (dy, row) in rows.iter().enumerate() {
        for (dx, token) in row.split_whitespace().enumerate() {
            let value: CellValue = token
                .parse()
                .unwrap_or_else(|err| panic!("bad token {token:?} in test grid: {err}"));
            board.set(origin.0 + dx as i32, origin.1 + dy as i32, value);
        }
    }
    board
}

/// Integer cell shorthand
pub fn int(n: i32) -> CellValue {
    CellValue::Integer(n)
}

/// Operator cell shorthand
pub fn op(symbol: char) -> CellValue {
    CellValue::Operator(
        OperatorKind::from_symbol(symbol).unwrap_or_else(|| panic!("unknown operator {symbol:?}")),
    )
}

/// `A > . > S` on row 5: submits A after two steps
pub fn relay_program() -> Board {
    grid((0, 5), &["A > . > S"])
}

/// The warp example: `v` travels right above the `@`, which sends it back one tick
///
/// ```text
/// v > . .
/// . 2 @ 0
/// . . 1 .
/// ```
pub fn warp_program(v: i32) -> Board {
    let mut board = grid((0, 4), &[". > . .", ". 2 @ 0", ". . 1 ."]);
    board.set(0, 4, int(v));
    board
}
