//! Rewriting the past
//!
//! A warp fired at tick `t` with offset `dt` lands on tick
//! `target = max(1, t - dt)`. The snapshot for `target` is copied and each
//! warped value is written at its destination. Every snapshot after `target`
//! is discarded for good, the copy is appended after it, and the simulation
//! resumes at `target + 1`.

use super::History;
use crate::board::Board;
use crate::reducer::TimeWarp;
use tracing::debug;

/// Result of applying the warps of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpOutcome {
    /// Tick whose snapshot was restored
    pub target_tick: usize,
    /// Tick the simulation resumes at, `target_tick + 1`
    pub resume_tick: usize,
    /// Rewritten board, now the live board and the latest snapshot
    pub board: Board,
    /// Snapshots dropped from the timeline
    pub discarded: usize,
}

/// Applies time-warp events to a [`History`]
#[derive(Debug)]
pub struct TimeTravel<'a> {
    history: &'a mut History,
}

impl<'a> TimeTravel<'a> {
    /// Wrap the timeline to be rewritten
    pub fn new(history: &'a mut History) -> Self {
        Self { history }
    }

    /// Tick a warp of `dt` fired at `current_tick` lands on
    pub fn target_tick(current_tick: usize, dt: i32) -> usize {
        let dt = usize::try_from(dt).unwrap_or(0);
        current_tick.saturating_sub(dt).max(1)
    }

    /// Rewind to the warps' target tick and inject their values
    ///
    /// All warps must share the same `dt`, which the reducer guarantees.
    /// Returns `None` when `warps` is empty.
    pub fn apply(self, current_tick: usize, warps: &[TimeWarp]) -> Option<WarpOutcome> {
        let dt = warps.first()?.dt;
        let target_tick = Self::target_tick(current_tick, dt);

        let mut board = self
            .history
            .get(target_tick)
            .unwrap_or_else(|| self.history.latest())
            .clone();
        for warp in warps {
            if let Some((x, y)) = warp.destination() {
                board.set(x, y, warp.value);
            }
        }

        let before = self.history.len();
        self.history.truncate(target_tick);
        let discarded = before.saturating_sub(self.history.len());
        self.history.push(board.clone());
        let resume_tick = self.history.len();

        debug!(
            from = current_tick,
            to = target_tick,
            resume = resume_tick,
            discarded,
            injected = warps.len(),
            "history rewritten"
        );

        Some(WarpOutcome {
            target_tick,
            resume_tick,
            board,
            discarded,
        })
    }
}
