//! Input adapters that turn pointer, touch and keyboard gestures into moves.

use super::{reorder, Ordered, ReorderError};

/// Where a reorder gesture came from. Only used for diagnostics; the
/// resulting moves are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Pointer,
    Touch,
    Keyboard,
}

/// Keyboard moves for the focused item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Up,
    Down,
    First,
    Last,
}

impl MoveKey {
    /// Target index for the item at `from` in a list of `len` items, or
    /// `None` when the key would not move it.
    pub fn target(self, from: usize, len: usize) -> Option<usize> {
        if from >= len {
            return None;
        }
        let to = match self {
            MoveKey::Up => from.checked_sub(1)?,
            MoveKey::Down => from + 1,
            MoveKey::First => 0,
            MoveKey::Last => len - 1,
        };
        (to != from && to < len).then_some(to)
    }
}

/// Vertical extent of a rendered list row, used to hit-test touch points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub bottom: f64,
}

impl RowBounds {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom
    }
}

/// Index of the row under vertical coordinate `y`.
pub fn row_at(y: f64, rows: &[RowBounds]) -> Option<usize> {
    rows.iter().position(|row| row.contains(y))
}

/// An in-progress drag. The list is reordered on every hover of a new row
/// (live reorder), and the session follows the dragged item to its new index.
/// Finishing or cancelling leaves the list in its last computed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    dragged: usize,
    modality: Modality,
}

impl DragSession {
    pub fn start(index: usize, modality: Modality) -> Self {
        Self {
            dragged: index,
            modality,
        }
    }

    /// Current index of the dragged item.
    pub fn dragged_index(&self) -> usize {
        self.dragged
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    /// The dragged item is over row `hover`. Returns the reordered list, or
    /// `None` when the item is already there.
    pub fn hover<T: Ordered + Clone>(
        &mut self,
        items: &[T],
        hover: usize,
    ) -> Result<Option<Vec<T>>, ReorderError> {
        if hover == self.dragged {
            return Ok(None);
        }
        let moved = reorder(items, self.dragged, hover)?;
        self.dragged = hover;
        Ok(Some(moved))
    }

    /// Follow the dragged item through a move made outside the drag.
    pub fn follow_move(&mut self, from: usize, to: usize) {
        let d = self.dragged;
        self.dragged = if d == from {
            to
        } else if from < d && d <= to {
            d - 1
        } else if to <= d && d < from {
            d + 1
        } else {
            d
        };
    }

    /// Follow the dragged item through a removal. Returns `false` when the
    /// removed item is the dragged one, which ends the session.
    pub fn follow_removal(&mut self, index: usize) -> bool {
        if index == self.dragged {
            return false;
        }
        if index < self.dragged {
            self.dragged -= 1;
        }
        true
    }

    /// Touch variant of [`DragSession::hover`]: the hovered row is found by
    /// hit-testing `y`. Points outside every row do nothing.
    pub fn touch_move<T: Ordered + Clone>(
        &mut self,
        items: &[T],
        y: f64,
        rows: &[RowBounds],
    ) -> Result<Option<Vec<T>>, ReorderError> {
        match row_at(y, rows) {
            Some(hover) => self.hover(items, hover),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::{is_dense, renumber};
    use crate::types::{NewStep, Step};

    fn steps(descriptions: &[&str]) -> Vec<Step> {
        renumber(
            descriptions
                .iter()
                .map(|d| NewStep::new(d).placed(0))
                .collect(),
        )
    }

    fn descriptions(items: &[Step]) -> Vec<&str> {
        items.iter().map(|s| s.description.as_str()).collect()
    }

    fn rows(n: usize) -> Vec<RowBounds> {
        (0..n)
            .map(|i| RowBounds::new(i as f64 * 40.0, (i + 1) as f64 * 40.0))
            .collect()
    }

    #[test]
    fn key_targets() {
        assert_eq!(MoveKey::Up.target(0, 3), None);
        assert_eq!(MoveKey::Up.target(2, 3), Some(1));
        assert_eq!(MoveKey::Down.target(2, 3), None);
        assert_eq!(MoveKey::Down.target(0, 3), Some(1));
        assert_eq!(MoveKey::First.target(2, 3), Some(0));
        assert_eq!(MoveKey::First.target(0, 3), None);
        assert_eq!(MoveKey::Last.target(0, 3), Some(2));
        assert_eq!(MoveKey::Last.target(5, 3), None);
    }

    #[test]
    fn hit_testing_rows() {
        let rows = rows(3);
        assert_eq!(row_at(0.0, &rows), Some(0));
        assert_eq!(row_at(39.9, &rows), Some(0));
        assert_eq!(row_at(40.0, &rows), Some(1));
        assert_eq!(row_at(119.0, &rows), Some(2));
        assert_eq!(row_at(120.0, &rows), None);
        assert_eq!(row_at(-5.0, &rows), None);
    }

    #[test]
    fn live_drag_follows_item() {
        let list = steps(&["boil", "chop", "fry", "serve"]);
        let mut drag = DragSession::start(0, Modality::Pointer);

        let list = drag.hover(&list, 1).unwrap().unwrap();
        assert_eq!(descriptions(&list), vec!["chop", "boil", "fry", "serve"]);
        assert_eq!(drag.dragged_index(), 1);

        let list = drag.hover(&list, 3).unwrap().unwrap();
        assert_eq!(descriptions(&list), vec!["chop", "fry", "serve", "boil"]);
        assert!(is_dense(&list));

        assert_eq!(drag.hover(&list, 3).unwrap(), None);
    }

    #[test]
    fn touch_and_pointer_give_identical_results() {
        let list = steps(&["boil", "chop", "fry"]);

        let mut pointer = DragSession::start(2, Modality::Pointer);
        let by_pointer = pointer.hover(&list, 0).unwrap();

        let mut touch = DragSession::start(2, Modality::Touch);
        let by_touch = touch.touch_move(&list, 10.0, &rows(3)).unwrap();

        assert_eq!(by_pointer, by_touch);
        assert_eq!(touch.modality(), Modality::Touch);
    }

    #[test]
    fn touch_outside_rows_is_ignored() {
        let list = steps(&["boil", "chop"]);
        let mut touch = DragSession::start(0, Modality::Touch);
        assert_eq!(touch.touch_move(&list, 500.0, &rows(2)).unwrap(), None);
        assert_eq!(touch.dragged_index(), 0);
    }

    #[test]
    fn session_follows_outside_moves() {
        let list = steps(&["a", "b", "c", "d", "e"]);
        for dragged in 0..list.len() {
            for from in 0..list.len() {
                for to in 0..list.len() {
                    let moved = reorder(&list, from, to).unwrap();
                    let mut drag = DragSession::start(dragged, Modality::Pointer);
                    drag.follow_move(from, to);
                    assert_eq!(
                        moved[drag.dragged_index()].description,
                        list[dragged].description,
                        "dragged {} moved {} -> {}",
                        dragged,
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn session_follows_removals() {
        let mut drag = DragSession::start(2, Modality::Pointer);
        assert!(drag.follow_removal(3));
        assert_eq!(drag.dragged_index(), 2);
        assert!(drag.follow_removal(0));
        assert_eq!(drag.dragged_index(), 1);
        assert!(!drag.follow_removal(1));
    }
}
