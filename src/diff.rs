//! Snapshot differ

use crate::error::{Error, Result};
use crate::flattened::{Flattened, Intersection};
use crate::point::Point;

/// A point whose contents differ between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub point: Point,
    pub prev: Intersection,
    pub next: Intersection,
}

impl DiffEntry {
    pub fn stone_changed(&self) -> bool {
        self.prev.stone() != self.next.stone()
    }

    /// Mark kind or label changed
    pub fn mark_changed(&self) -> bool {
        self.prev.mark() != self.next.mark() || self.prev.text_label() != self.next.text_label()
    }
}

/// Compare two snapshots of the same size.
///
/// Every point is visited in row-major order and stone and mark are compared
/// independently; an entry is emitted only where something differs. The
/// display relies on the traversal being complete.
pub fn diff(previous: &Flattened, next: &Flattened) -> Result<Vec<DiffEntry>> {
    if previous.size() != next.size() {
        return Err(Error::DimensionMismatch {
            previous: previous.size(),
            next: next.size(),
        });
    }

    Ok(previous
        .iter()
        .zip(next.iter())
        .filter(|((_, a), (_, b))| a != b)
        .map(|((point, a), (_, b))| DiffEntry {
            point,
            prev: a.clone(),
            next: b.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flattened::{Mark, StoneState};

    #[test]
    fn identical_snapshots_have_empty_diff() {
        let a = Flattened::builder(9)
            .stone((3, 3), StoneState::Black)
            .label((1, 1), Mark::Label, "A")
            .build()
            .unwrap();
        assert!(diff(&a, &a).unwrap().is_empty());
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let err = diff(&Flattened::empty(9), &Flattened::empty(13)).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { previous: 9, next: 13 });
    }

    #[test]
    fn stone_and_mark_changes_are_independent() {
        let a = Flattened::builder(9)
            .stone((0, 0), StoneState::Black)
            .stone((5, 5), StoneState::White)
            .mark((5, 5), Mark::Triangle)
            .build()
            .unwrap();
        let b = Flattened::builder(9)
            .stone((0, 0), StoneState::White)
            .stone((5, 5), StoneState::White)
            .mark((5, 5), Mark::Square)
            .build()
            .unwrap();
        let d = diff(&a, &b).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].point, Point::new(0, 0));
        assert!(d[0].stone_changed());
        assert!(!d[0].mark_changed());
        assert_eq!(d[1].point, Point::new(5, 5));
        assert!(!d[1].stone_changed());
        assert!(d[1].mark_changed());
    }

    #[test]
    fn label_text_change_counts_as_mark_change() {
        let a = Flattened::builder(9).label((2, 2), Mark::Label, "A").build().unwrap();
        let b = Flattened::builder(9).label((2, 2), Mark::Label, "B").build().unwrap();
        let d = diff(&a, &b).unwrap();
        assert_eq!(d.len(), 1);
        assert!(d[0].mark_changed());
    }

    #[test]
    fn entries_are_row_major() {
        let b = Flattened::builder(9)
            .stone((8, 0), StoneState::Black)
            .stone((0, 1), StoneState::Black)
            .stone((3, 0), StoneState::White)
            .build()
            .unwrap();
        let pts: Vec<_> = diff(&Flattened::empty(9), &b).unwrap().into_iter().map(|e| e.point).collect();
        assert_eq!(pts, vec![Point::new(3, 0), Point::new(8, 0), Point::new(0, 1)]);
    }
}
