//! Output marker watch
//!
//! The positions of every `S` in the program are fixed when the detector is
//! built. A marker counts as submitted as soon as the cell holds anything
//! else, including nothing at all.

use crate::board::{Board, CellValue, Coord};
use crate::TickError;
use tracing::debug;

/// Detects overwritten output markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDetector {
    markers: Vec<Coord>,
}

impl SubmissionDetector {
    /// Record the output markers of `program`
    pub fn new(program: &Board) -> Self {
        let markers = program
            .iter()
            .filter(|(_, _, value)| *value == CellValue::OutputMarker)
            .map(|(x, y, _)| (x, y))
            .collect();
        Self { markers }
    }

    /// Watched coordinates
    pub fn markers(&self) -> &[Coord] {
        &self.markers
    }

    /// Value submitted on `board`, if any
    ///
    /// Fails when overwritten markers disagree.
    pub fn check(&self, board: &Board) -> Result<Option<CellValue>, TickError> {
        let mut values: Vec<CellValue> = Vec::new();
        for &(x, y) in &self.markers {
            let current = board.get(x, y);
            if current != CellValue::OutputMarker && !values.contains(&current) {
                debug!(x, y, value = %current, "output marker overwritten");
                values.push(current);
            }
        }

        match values.len() {
            0 => Ok(None),
            1 => Ok(Some(values[0])),
            _ => Err(TickError::MultipleSubmissions { values }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_markers() -> Board {
        [
            (0, 0, CellValue::OutputMarker),
            (4, 0, CellValue::OutputMarker),
            (2, 0, CellValue::Integer(1)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_untouched_markers() {
        let program = two_markers();
        let detector = SubmissionDetector::new(&program);
        assert_eq!(detector.markers(), &[(0, 0), (4, 0)]);
        assert_eq!(detector.check(&program), Ok(None));
    }

    #[test]
    fn test_single_submission() {
        let program = two_markers();
        let detector = SubmissionDetector::new(&program);

        let mut board = program.clone();
        board.set(4, 0, CellValue::Integer(12));
        assert_eq!(detector.check(&board), Ok(Some(CellValue::Integer(12))));

        // The same value on both markers is still one submission
        board.set(0, 0, CellValue::Integer(12));
        assert_eq!(detector.check(&board), Ok(Some(CellValue::Integer(12))));
    }

    #[test]
    fn test_erased_marker_submits_empty() {
        let program = two_markers();
        let detector = SubmissionDetector::new(&program);

        let mut board = program.clone();
        board.set(0, 0, CellValue::Empty);
        assert_eq!(detector.check(&board), Ok(Some(CellValue::Empty)));
    }

    #[test]
    fn test_disagreeing_submissions() {
        let program = two_markers();
        let detector = SubmissionDetector::new(&program);

        let mut board = program.clone();
        board.set(0, 0, CellValue::Integer(1));
        board.set(4, 0, CellValue::Integer(2));
        assert_eq!(
            detector.check(&board),
            Err(TickError::MultipleSubmissions {
                values: vec![CellValue::Integer(1), CellValue::Integer(2)],
            })
        );
    }

    #[test]
    fn test_markers_added_later_are_ignored() {
        let program = two_markers();
        let detector = SubmissionDetector::new(&program);

        let mut board = program.clone();
        board.set(9, 9, CellValue::OutputMarker);
        board.set(9, 9, CellValue::Integer(3));
        assert_eq!(detector.check(&board), Ok(None));
    }
}
