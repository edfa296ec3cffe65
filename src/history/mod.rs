//! Snapshot timeline
//!
//! One board per tick, 1-indexed: the snapshot for tick `t` sits at position
//! `t`, and the last snapshot is the live board. A time warp truncates the
//! timeline and appends the rewritten board; there is never more than one branch.

mod time_travel;

pub use time_travel::{TimeTravel, WarpOutcome};

use crate::board::Board;

/// Ordered board snapshots, one per tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    snapshots: Vec<Board>,
}

impl History {
    /// Start a timeline whose tick 1 is `initial`
    pub fn new(initial: Board) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }

    /// Number of recorded ticks
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a timeline holds at least tick 1
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot recorded for `tick` (1-based)
    pub fn get(&self, tick: usize) -> Option<&Board> {
        tick.checked_sub(1).and_then(|idx| self.snapshots.get(idx))
    }

    /// Most recent snapshot
    pub fn latest(&self) -> &Board {
        // `new` seeds one snapshot and `truncate` never drops tick 1
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Record the board for the next tick
    pub fn push(&mut self, board: Board) {
        self.snapshots.push(board);
    }

    /// Keep only ticks `1..=tick`; tick 1 is always kept
    pub fn truncate(&mut self, tick: usize) {
        self.snapshots.truncate(tick.max(1));
    }

    /// Discard everything and restart from `initial`
    pub fn reset(&mut self, initial: Board) {
        self.snapshots.clear();
        self.snapshots.push(initial);
    }

    /// Snapshots in tick order
    pub fn iter(&self) -> impl Iterator<Item = &Board> + '_ {
        self.snapshots.iter()
    }

    /// Fingerprint of every snapshot in tick order
    pub fn fingerprints(&self) -> Vec<blake3::Hash> {
        self.snapshots.iter().map(Board::fingerprint).collect()
    }
}
