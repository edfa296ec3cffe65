//! Sparse 2D cell store
//!
//! The grid is unbounded; only non-empty cells are stored. Coordinates are
//! `(x, y)` with `x` growing rightward and `y` growing downward.

mod cell;

pub use cell::{
    integer_in_range, token_is_valid, CellValue, Direction, InputPort, OperatorKind,
    INTEGER_MAX, INTEGER_MIN,
};

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Grid coordinate `(x, y)`
pub type Coord = (i32, i32);

/// Inclusive bounding box of occupied cells
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    /// Leftmost occupied column
    pub min_x: i32,
    /// Rightmost occupied column
    pub max_x: i32,
    /// Topmost occupied row
    pub min_y: i32,
    /// Bottommost occupied row
    pub max_y: i32,
}

impl Bounds {
    /// Box covering a single coordinate
    pub fn point((x, y): Coord) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Grow to cover `coord`
    pub fn include(&mut self, (x, y): Coord) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Smallest box covering both
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Number of columns covered
    pub fn width(&self) -> u64 {
        (i64::from(self.max_x) - i64::from(self.min_x) + 1) as u64
    }

    /// Number of rows covered
    pub fn height(&self) -> u64 {
        (i64::from(self.max_y) - i64::from(self.min_y) + 1) as u64
    }

    /// Cells covered, saturating at `u64::MAX` for the full plane
    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }
}

/// Sparse grid of cells
///
/// Invariant: no key maps to [`CellValue::Empty`]. Keys are ordered so
/// enumeration is deterministic across runs.
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: BTreeMap<Coord, CellValue>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cell at `(x, y)`
    pub fn get(&self, x: i32, y: i32) -> CellValue {
        self.cells.get(&(x, y)).copied().unwrap_or_default()
    }

    /// Write the cell at `(x, y)`. Writing `Empty` removes the key.
    pub fn set(&mut self, x: i32, y: i32, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&(x, y));
        } else {
            self.cells.insert((x, y), value);
        }
    }

    /// Remove the cell at `(x, y)`, returning what was there
    pub fn remove(&mut self, x: i32, y: i32) -> CellValue {
        self.cells.remove(&(x, y)).unwrap_or_default()
    }

    /// Non-empty cells in ascending `(x, y)` order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, CellValue)> + '_ {
        self.cells.iter().map(|(&(x, y), &value)| (x, y, value))
    }

    /// Snapshot of all non-empty cells
    pub fn enumerate(&self) -> Vec<(i32, i32, CellValue)> {
        self.iter().collect()
    }

    /// Coordinates of every non-empty cell
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box of occupied cells, `None` when the board is empty
    pub fn bounds(&self) -> Option<Bounds> {
        let mut coords = self.coords();
        let first = coords.next()?;
        let mut bounds = Bounds::point(first);
        for coord in coords {
            bounds.include(coord);
        }
        Some(bounds)
    }

    /// Replace every cell holding `from` with `to`, returning how many changed
    pub fn replace_all(&mut self, from: CellValue, to: CellValue) -> usize {
        let targets: Vec<Coord> = self
            .cells
            .iter()
            .filter(|(_, value)| **value == from)
            .map(|(&coord, _)| coord)
            .collect();
        for &(x, y) in &targets {
            self.set(x, y, to);
        }
        targets.len()
    }

    /// Content hash over the ordered cells
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for (x, y, value) in self.iter() {
            hasher.update(&x.to_le_bytes());
            hasher.update(&y.to_le_bytes());
            hasher.update(value.to_string().as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize()
    }

    /// Text grid over the board's bounds, `.` for empty cells
    pub fn render(&self) -> String {
        let Some(bounds) = self.bounds() else {
            return String::new();
        };

        let width = self
            .iter()
            .map(|(_, _, value)| value.to_string().len())
            .max()
            .unwrap_or(1);

        let mut out = String::new();
        for y in bounds.min_y..=bounds.max_y {
            let row: Vec<String> = (bounds.min_x..=bounds.max_x)
                .map(|x| format!("{:>width$}", self.get(x, y).to_string()))
                .collect();
            let _ = writeln!(out, "{}", row.join(" ").trim_end());
        }
        out
    }
}

impl FromIterator<(i32, i32, CellValue)> for Board {
    fn from_iter<I: IntoIterator<Item = (i32, i32, CellValue)>>(iter: I) -> Self {
        let mut board = Board::new();
        for (x, y, value) in iter {
            board.set(x, y, value);
        }
        board
    }
}
