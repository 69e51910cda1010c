//! Reversible-action history.
//!
//! Every arrangement mutation is recorded as an [`Action`]: a tagged
//! kind plus `from`/`to` snapshots of the whole arrangement. Applying
//! or reverting an action is a single snapshot restore — no closures
//! over host state, so actions stay serializable and independent
//! editors stay independent.
//!
//! The history is a single list with a cursor. Executing while undone
//! actions sit past the cursor discards them (no branches persist),
//! and the list is bounded: the oldest entries drop off the head with
//! the cursor shifted down to match.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{Arrangement, ArrangementSnapshot};

/// What kind of user-facing command an action records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Remove,
    Reorder,
    Clear,
    SelectAll,
    Bulk,
}

/// One recorded, reversible state transition
#[derive(Debug, Clone)]
pub struct Action {
    /// Assigned by the history when executed
    pub id: u64,
    pub kind: ActionKind,
    /// Human-readable label for history UIs
    pub description: String,
    pub from: ArrangementSnapshot,
    pub to: ArrangementSnapshot,
    pub timestamp: DateTime<Utc>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Action {
    pub fn new(
        kind: ActionKind,
        description: impl Into<String>,
        from: ArrangementSnapshot,
        to: ArrangementSnapshot,
    ) -> Self {
        Action {
            id: 0,
            kind,
            description: description.into(),
            from,
            to,
            timestamp: Utc::now(),
            can_undo: true,
            can_redo: true,
        }
    }
}

/// Snapshot handed to listeners after every mutating history call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRedoState {
    pub len: usize,
    /// Index of the last applied action; None = pristine
    pub current: Option<usize>,
    pub max_size: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

type Listener = Box<dyn FnMut(&UndoRedoState)>;

/// The bounded, branch-discarding action history for one editor
pub struct History {
    actions: Vec<Action>,
    current: Option<usize>,
    max_size: usize,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("len", &self.actions.len())
            .field("current", &self.current)
            .field("max_size", &self.max_size)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        History {
            actions: Vec::new(),
            current: None,
            max_size: max_size.max(1),
            next_id: 1,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The most recently applied action, if any
    pub fn current_action(&self) -> Option<&Action> {
        self.actions.get(self.current?)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn can_undo(&self) -> bool {
        self.current_action().is_some_and(|a| a.can_undo)
    }

    pub fn can_redo(&self) -> bool {
        let next = self.current.map_or(0, |c| c + 1);
        self.actions.get(next).is_some_and(|a| a.can_redo)
    }

    pub fn state(&self) -> UndoRedoState {
        UndoRedoState {
            len: self.actions.len(),
            current: self.current,
            max_size: self.max_size,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Apply an action and record it at the cursor. Anything past the
    /// cursor is discarded first; the bound is enforced afterwards by
    /// dropping from the head and shifting the cursor down.
    pub fn execute(&mut self, arrangement: &mut Arrangement, mut action: Action) {
        arrangement.restore(&action.to);

        match self.current {
            Some(c) => self.actions.truncate(c + 1),
            None => self.actions.clear(),
        }

        action.id = self.next_id;
        self.next_id += 1;
        self.actions.push(action);
        let mut cursor = self.actions.len() - 1;

        if self.actions.len() > self.max_size {
            let excess = self.actions.len() - self.max_size;
            self.actions.drain(..excess);
            cursor -= excess;
        }
        self.current = Some(cursor);
        self.notify();
    }

    /// Revert the action at the cursor. Returns false (untouched state)
    /// when pristine or the action forbids undo.
    pub fn undo(&mut self, arrangement: &mut Arrangement) -> bool {
        let Some(c) = self.current else {
            return false;
        };
        let action = &self.actions[c];
        if !action.can_undo {
            return false;
        }
        arrangement.restore(&action.from);
        self.current = c.checked_sub(1);
        self.notify();
        true
    }

    /// Re-apply the action after the cursor. Returns false when there
    /// is none or it forbids redo.
    pub fn redo(&mut self, arrangement: &mut Arrangement) -> bool {
        let next = self.current.map_or(0, |c| c + 1);
        let Some(action) = self.actions.get(next) else {
            return false;
        };
        if !action.can_redo {
            return false;
        }
        arrangement.restore(&action.to);
        self.current = Some(next);
        self.notify();
        true
    }

    /// Step undo/redo until the cursor equals `target` (None =
    /// pristine). Best-effort: stops and returns false at the first
    /// refused step, leaving the steps already taken applied.
    pub fn jump_to(&mut self, arrangement: &mut Arrangement, target: Option<usize>) -> bool {
        if let Some(t) = target
            && t >= self.actions.len()
        {
            return false;
        }
        let target_pos = target.map_or(-1, |t| t as i64);
        loop {
            let cursor_pos = self.current.map_or(-1, |c| c as i64);
            if cursor_pos == target_pos {
                return true;
            }
            let stepped = if cursor_pos > target_pos {
                self.undo(arrangement)
            } else {
                self.redo(arrangement)
            };
            if !stepped {
                return false;
            }
        }
    }

    /// Drop all recorded actions (the arrangement is left as-is)
    pub fn clear(&mut self) {
        self.actions.clear();
        self.current = None;
        self.notify();
    }

    /// Subscribe to history changes. The listener is called
    /// synchronously after every mutating call, with the settled state.
    /// Returns a token for [`History::unsubscribe`].
    pub fn subscribe(&mut self, listener: impl FnMut(&UndoRedoState) + 'static) -> u64 {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, token: u64) {
        self.listeners.retain(|(id, _)| *id != token);
    }

    fn notify(&mut self) {
        let state = self.state();
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pane;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// An action that moves `key` from available to the end of selected
    fn add_action(arr: &Arrangement, key: &str) -> Action {
        let from = arr.snapshot();
        let mut next = arr.clone();
        assert!(next.move_key(key, Pane::Available, Pane::Selected, usize::MAX));
        Action::new(ActionKind::Add, format!("add {key}"), from, next.snapshot())
    }

    fn arr_abc() -> Arrangement {
        Arrangement::new(["a", "b", "c", "d", "e", "f"].map(String::from))
    }

    #[test]
    fn test_execute_applies_and_records() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        assert_eq!(arr.selected(), ["a"]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.current_index(), Some(0));
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current_action().unwrap().id, 1);
    }

    #[test]
    fn test_undo_redo_inverse_law() {
        let mut arr = arr_abc();
        let pristine = arr.clone();
        let mut history = History::new(50);
        let action = add_action(&arr, "b");
        history.execute(&mut arr, action);
        let applied = arr.clone();

        assert!(history.undo(&mut arr));
        assert_eq!(arr, pristine);
        assert_eq!(history.current_index(), None);

        assert!(history.redo(&mut arr));
        assert_eq!(arr, applied);
        assert_eq!(history.current_index(), Some(0));
    }

    #[test]
    fn test_undo_redo_refuse_at_bounds() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        assert!(!history.undo(&mut arr));
        assert!(!history.redo(&mut arr));
        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        assert!(!history.redo(&mut arr));
        assert!(history.undo(&mut arr));
        assert!(!history.undo(&mut arr));
    }

    #[test]
    fn test_branch_truncation_on_execute() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        let action = add_action(&arr, "b");
        history.execute(&mut arr, action);
        let action = add_action(&arr, "c");
        history.execute(&mut arr, action);

        history.undo(&mut arr);
        history.undo(&mut arr);
        // Cursor sits on "add a"; executing discards "add b"/"add c"
        let action = add_action(&arr, "d");
        history.execute(&mut arr, action);
        let labels: Vec<&str> = history
            .actions()
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(labels, ["add a", "add d"]);
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(arr.selected(), ["a", "d"]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_bounded_history_shifts_cursor() {
        let mut arr = arr_abc();
        let mut history = History::new(4);
        for key in ["a", "b", "c", "d", "e", "f"] {
            let action = add_action(&arr, key);
            history.execute(&mut arr, action);
        }
        assert_eq!(history.len(), 4);
        // Earliest two dropped; cursor still points at the last action
        assert_eq!(history.current_index(), Some(3));
        assert_eq!(history.current_action().unwrap().description, "add f");
        let labels: Vec<&str> = history
            .actions()
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(labels, ["add c", "add d", "add e", "add f"]);
        // Undo still walks back through what remains
        assert!(history.undo(&mut arr));
        assert_eq!(arr.selected(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_jump_to_walks_both_directions() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        for key in ["a", "b", "c"] {
            let action = add_action(&arr, key);
            history.execute(&mut arr, action);
        }
        assert!(history.jump_to(&mut arr, Some(0)));
        assert_eq!(arr.selected(), ["a"]);
        assert!(history.jump_to(&mut arr, Some(2)));
        assert_eq!(arr.selected(), ["a", "b", "c"]);
        assert!(history.jump_to(&mut arr, None));
        assert!(arr.selected().is_empty());
        // Out of range refuses without stepping
        assert!(!history.jump_to(&mut arr, Some(7)));
        assert!(arr.selected().is_empty());
    }

    #[test]
    fn test_jump_to_stops_at_refused_step() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        let mut blocked = add_action(&arr, "b");
        blocked.can_undo = false;
        history.execute(&mut arr, blocked);
        let action = add_action(&arr, "c");
        history.execute(&mut arr, action);

        // Walks back one step, then the blocked action refuses
        assert!(!history.jump_to(&mut arr, None));
        assert_eq!(history.current_index(), Some(1));
        assert_eq!(arr.selected(), ["a", "b"]);
    }

    #[test]
    fn test_listeners_see_settled_state() {
        let seen: Rc<RefCell<Vec<UndoRedoState>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut arr = arr_abc();
        let mut history = History::new(50);
        let token = history.subscribe(move |state| sink.borrow_mut().push(*state));

        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        history.undo(&mut arr);
        {
            let seen = seen.borrow();
            assert_eq!(seen.len(), 2);
            assert_eq!(
                seen[0],
                UndoRedoState {
                    len: 1,
                    current: Some(0),
                    max_size: 50,
                    can_undo: true,
                    can_redo: false,
                }
            );
            assert_eq!(seen[1].current, None);
            assert!(seen[1].can_redo);
        }

        history.unsubscribe(token);
        history.redo(&mut arr);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_clear_empties_but_keeps_arrangement() {
        let mut arr = arr_abc();
        let mut history = History::new(50);
        let action = add_action(&arr, "a");
        history.execute(&mut arr, action);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.current_index(), None);
        assert_eq!(arr.selected(), ["a"]);
        assert!(!history.can_undo());
    }
}
