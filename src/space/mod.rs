//! Spacetime accounting
//!
//! The spacetime volume of a run is the area of the smallest box covering
//! every cell ever occupied, times the number of recorded ticks. It is a
//! score, nothing in the engine depends on it.

mod tracker;

pub use tracker::SpacetimeTracker;

use crate::history::History;

/// Detailed spacetime breakdown of a timeline
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpacetimeProfile {
    /// Columns spanned by the occupied region
    pub width: u64,
    /// Rows spanned by the occupied region
    pub height: u64,
    /// Recorded ticks
    pub ticks: usize,
    /// `width * height * ticks`, 0 if nothing was ever occupied
    pub volume: u64,
    /// Most cells occupied in a single tick
    pub peak_cells: usize,
}

impl SpacetimeProfile {
    /// Measure every snapshot of `history`
    pub fn measure(history: &History) -> Self {
        let mut tracker = SpacetimeTracker::new();
        for board in history.iter() {
            tracker.observe(board);
        }
        tracker.into_profile()
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Spacetime volume: {}\n  Width: {}\n  Height: {}\n  Ticks: {}\n  Peak cells: {}",
            self.volume, self.width, self.height, self.ticks, self.peak_cells
        )
    }
}

/// `(max_x - min_x + 1) * (max_y - min_y + 1) * ticks` over all snapshots
pub fn spacetime_volume(history: &History) -> u64 {
    SpacetimeProfile::measure(history).volume
}
