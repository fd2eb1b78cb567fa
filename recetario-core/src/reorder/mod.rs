//! Ordered list engine for ingredients and recipe steps.
//!
//! Every operation returns a new sequence whose `order` markers are exactly
//! `1..=N`. Input modalities (pointer, touch, keyboard) live in [`input`] and
//! reduce to the same `(from, to)` move.

pub mod input;

use thiserror::Error;

use crate::types::{Ingredient, Step};

pub use input::{row_at, DragSession, Modality, MoveKey, RowBounds};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("Index {index} is out of bounds for a list of {len} item(s)")]
    OutOfBounds { index: usize, len: usize },
}

/// Items that carry a 1-based position marker.
pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

impl Ordered for Ingredient {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl Ordered for Step {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Reassign `order` from the current positions: first item gets 1.
pub fn renumber<T: Ordered>(mut items: Vec<T>) -> Vec<T> {
    for (i, item) in items.iter_mut().enumerate() {
        item.set_order(position(i));
    }
    items
}

/// True when the markers are exactly `1..=len` in sequence order.
pub fn is_dense<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(i, item)| item.order() == position(i))
}

/// Move the item at `from` so it ends up at index `to`, shifting the items
/// in between by one. Relative order of all other items is preserved.
pub fn reorder<T: Ordered + Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, ReorderError> {
    check_index(items, from)?;
    check_index(items, to)?;

    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(renumber(moved))
}

/// Remove the item at `index` and close the gap.
pub fn remove<T: Ordered + Clone>(items: &[T], index: usize) -> Result<Vec<T>, ReorderError> {
    check_index(items, index)?;

    let mut remaining = items.to_vec();
    remaining.remove(index);
    Ok(renumber(remaining))
}

fn check_index<T>(items: &[T], index: usize) -> Result<(), ReorderError> {
    if index < items.len() {
        Ok(())
    } else {
        Err(ReorderError::OutOfBounds {
            index,
            len: items.len(),
        })
    }
}

fn position(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewIngredient;

    fn ingredients(names: &[&str]) -> Vec<Ingredient> {
        renumber(
            names
                .iter()
                .map(|n| NewIngredient::new(n, "1", "").placed(0))
                .collect(),
        )
    }

    fn names(items: &[Ingredient]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    fn orders(items: &[Ingredient]) -> Vec<u32> {
        items.iter().map(|i| i.order).collect()
    }

    #[test]
    fn move_first_to_last() {
        let list = ingredients(&["flour", "sugar", "eggs"]);
        let moved = reorder(&list, 0, 2).unwrap();
        assert_eq!(names(&moved), vec!["sugar", "eggs", "flour"]);
        assert_eq!(orders(&moved), vec![1, 2, 3]);
        assert_eq!(moved[2].order, 3);
        // Input untouched
        assert_eq!(names(&list), vec!["flour", "sugar", "eggs"]);
    }

    #[test]
    fn move_last_to_first() {
        let list = ingredients(&["flour", "sugar", "eggs", "milk"]);
        let moved = reorder(&list, 3, 0).unwrap();
        assert_eq!(names(&moved), vec!["milk", "flour", "sugar", "eggs"]);
        assert!(is_dense(&moved));
    }

    #[test]
    fn move_to_same_index_is_identity() {
        let list = ingredients(&["flour", "sugar"]);
        assert_eq!(reorder(&list, 1, 1).unwrap(), list);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let list = ingredients(&["flour"]);
        assert_eq!(
            reorder(&list, 0, 1),
            Err(ReorderError::OutOfBounds { index: 1, len: 1 })
        );
        assert!(remove(&list, 3).is_err());
        assert!(reorder::<Ingredient>(&[], 0, 0).is_err());
    }

    #[test]
    fn remove_closes_gap() {
        let list = ingredients(&["flour", "sugar", "eggs"]);
        let left = remove(&list, 1).unwrap();
        assert_eq!(names(&left), vec!["flour", "eggs"]);
        assert_eq!(orders(&left), vec![1, 2]);
    }

    #[test]
    fn renumber_repairs_gaps() {
        let mut list = ingredients(&["a", "b", "c"]);
        list[0].order = 7;
        list[2].order = 7;
        assert!(!is_dense(&list));
        assert!(is_dense(&renumber(list)));
    }

    #[test]
    fn every_move_of_a_five_item_list_stays_dense() {
        let list = ingredients(&["a", "b", "c", "d", "e"]);
        for from in 0..list.len() {
            for to in 0..list.len() {
                let moved = reorder(&list, from, to).unwrap();
                assert!(is_dense(&moved), "from {} to {}", from, to);
                assert_eq!(moved[to].name, list[from].name);
            }
        }
    }
}
