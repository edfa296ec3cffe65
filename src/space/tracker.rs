//! Occupancy tracking across snapshots

use crate::board::{Board, Bounds};

/// Accumulates the occupied region of a sequence of boards
#[derive(Debug, Default)]
pub struct SpacetimeTracker {
    /// Union of every occupied coordinate seen so far
    bounds: Option<Bounds>,

    /// Snapshots observed
    ticks: usize,

    /// Largest number of occupied cells in one snapshot
    peak_cells: usize,
}

impl SpacetimeTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one snapshot
    pub fn observe(&mut self, board: &Board) {
        self.ticks += 1;
        self.peak_cells = self.peak_cells.max(board.len());

        if let Some(snapshot) = board.bounds() {
            self.bounds = Some(match self.bounds {
                Some(seen) => seen.union(snapshot),
                None => snapshot,
            });
        }
    }

    /// Union of occupied coordinates, `None` if nothing was ever occupied
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Area of the union times the number of snapshots, saturating
    pub fn volume(&self) -> u64 {
        self.bounds
            .map_or(0, |bounds| bounds.area().saturating_mul(self.ticks as u64))
    }

    /// Finish into a profile
    pub fn into_profile(self) -> super::SpacetimeProfile {
        let bounds = self.bounds.unwrap_or_default();
        let occupied = self.bounds.is_some();
        super::SpacetimeProfile {
            width: if occupied { bounds.width() } else { 0 },
            height: if occupied { bounds.height() } else { 0 },
            ticks: self.ticks,
            volume: self.volume(),
            peak_cells: self.peak_cells,
        }
    }
}
