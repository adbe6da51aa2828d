//! DragReorderController: two-phase pick-up/drop reordering over an ordered key sequence
//!
//! The controller knows nothing about what the keys represent. Column layouts and
//! filter-field panels both expose their order through [`KeySequence`] and share
//! this one implementation.
//!
//! ```text
//! Idle -> Dragging(dragged) -> Dragging(dragged, over) -> drop  -> Idle (commit)
//!                                                      \-> end -> Idle (abort)
//! ```
use std::fmt::Debug;

use tracing::{debug, trace};

/// An ordered sequence of unique keys that can be rewritten as a whole
pub trait KeySequence {
    type Key: Clone + PartialEq + Debug;

    /// Current order of keys
    fn key_order(&self) -> Vec<Self::Key>;

    /// Replace the whole order; `order` is always a permutation of `key_order()`
    fn commit_order(&mut self, order: Vec<Self::Key>);
}

impl<K: Clone + PartialEq + Debug> KeySequence for Vec<K> {
    type Key = K;

    fn key_order(&self) -> Vec<K> {
        self.clone()
    }

    fn commit_order(&mut self, order: Vec<K>) {
        *self = order;
    }
}

/// Remove `key` and reinsert it at the index `target` held before the removal
///
/// Returns `None` when the move would not change anything or either key is absent.
pub fn move_to_index_of<K: Clone + PartialEq>(order: &[K], key: &K, target: &K) -> Option<Vec<K>> {
    if key == target {
        return None;
    }
    let from = order.iter().position(|k| k == key)?;
    let to = order.iter().position(|k| k == target)?;
    let mut next = order.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Some(next)
}

/// Remove `key` and reinsert it immediately before `before`
///
/// Returns `None` when nothing would move or either key is absent.
pub fn move_before<K: Clone + PartialEq>(order: &[K], key: &K, before: &K) -> Option<Vec<K>> {
    if key == before || !order.contains(before) {
        return None;
    }
    let from = order.iter().position(|k| k == key)?;
    let mut next = order.to_vec();
    let moved = next.remove(from);
    let to = next.iter().position(|k| k == before)?;
    next.insert(to, moved);
    (next != order).then_some(next)
}

/// Drag session state; a single slot, so at most one session is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState<K> {
    Idle,
    Dragging { dragged: K, over: Option<K> },
}

impl<K> Default for DragState<K> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Result of a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The dragged key moved from one index to another
    Moved { from: usize, to: usize },
    /// Dropped onto itself, onto nothing, or a key was missing from the sequence
    Unchanged,
    /// No drag session was active
    NotDragging,
}

impl DropOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

#[derive(Debug, Clone)]
pub struct DragReorderController<K> {
    state: DragState<K>,
}

impl<K> Default for DragReorderController<K> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
        }
    }
}

impl<K: Clone + PartialEq + Debug> DragReorderController<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState<K> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<&K> {
        match &self.state {
            DragState::Dragging { dragged, .. } => Some(dragged),
            DragState::Idle => None,
        }
    }

    pub fn over(&self) -> Option<&K> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Pick up `key`. Starting a new drag replaces any session still in the slot.
    pub fn drag_start(&mut self, key: K) {
        if let DragState::Dragging { dragged, .. } = &self.state {
            debug!("Drag of {:?} superseded by {:?}", dragged, key);
        }
        self.state = DragState::Dragging {
            dragged: key,
            over: None,
        };
    }

    /// Pointer moved over `key`; hovering the dragged key itself clears the target
    pub fn drag_over(&mut self, key: K) {
        match &mut self.state {
            DragState::Dragging { dragged, over } => {
                *over = if *dragged == key { None } else { Some(key) };
            }
            DragState::Idle => trace!("drag_over({:?}) ignored while idle", key),
        }
    }

    /// Commit the session against `sequence` and return to idle
    pub fn drop_on<S: KeySequence<Key = K>>(&mut self, sequence: &mut S) -> DropOutcome {
        let DragState::Dragging { dragged, over } = std::mem::take(&mut self.state) else {
            trace!("drop ignored while idle");
            return DropOutcome::NotDragging;
        };
        let Some(target) = over else {
            return DropOutcome::Unchanged;
        };
        let order = sequence.key_order();
        let (Some(from), Some(to)) = (
            order.iter().position(|k| *k == dragged),
            order.iter().position(|k| *k == target),
        ) else {
            trace!("drop of {:?} onto {:?} references a stale key", dragged, target);
            return DropOutcome::Unchanged;
        };
        match move_to_index_of(&order, &dragged, &target) {
            Some(next) => {
                sequence.commit_order(next);
                debug!("Moved {:?} from {} to {}", dragged, from, to);
                DropOutcome::Moved { from, to }
            }
            None => DropOutcome::Unchanged,
        }
    }

    /// End the session without a drop; the sequence is left untouched.
    /// Returns true if a session was aborted.
    pub fn drag_end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    /// Order the sequence would have if the session were dropped now
    pub fn preview<S: KeySequence<Key = K>>(&self, sequence: &S) -> Vec<K> {
        let order = sequence.key_order();
        match &self.state {
            DragState::Dragging {
                dragged,
                over: Some(target),
            } => move_to_index_of(&order, dragged, target).unwrap_or(order),
            _ => order,
        }
    }
}
