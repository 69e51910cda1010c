//! The per-instance editor context.
//!
//! A [`ColumnEditor`] owns one arrangement, its selection marks, its
//! action history and its keyboard engine — there is no shared or
//! module-level state, so a process can run any number of independent
//! editors. Both front ends funnel into [`ColumnEditor::apply_move`];
//! bulk commands funnel through the pure builders in [`crate::ops::bulk`].

use crossterm::event::KeyEvent;

use crate::model::{Arrangement, ColumnCatalog, Constraints, EditorConfig, Pane};
use crate::ops::bulk::{self, BulkOp, BulkOutcome};
use crate::ops::selection::Selection;

use super::drag::{DragData, DropZone, MoveOp, MoveRequest, drop_result};
use super::history::{Action, ActionKind, History, UndoRedoState};
use super::keyboard::{Focus, KeyboardNav, NavEvent, PaneLengths};

pub struct ColumnEditor {
    catalog: ColumnCatalog,
    arrangement: Arrangement,
    selection: Selection,
    history: History,
    keyboard: KeyboardNav,
    constraints: Constraints,
    /// Pending screen-reader texts, drained by the host each frame
    announcements: Vec<String>,
}

impl ColumnEditor {
    /// Start with every catalog column in the available pool
    pub fn new(catalog: ColumnCatalog, config: &EditorConfig) -> Self {
        let arrangement = Arrangement::new(catalog.keys().map(String::from));
        Self::with_arrangement(catalog, arrangement, config)
    }

    /// Start from a host-supplied split (e.g. a restored view)
    pub fn with_arrangement(
        catalog: ColumnCatalog,
        arrangement: Arrangement,
        config: &EditorConfig,
    ) -> Self {
        ColumnEditor {
            catalog,
            arrangement,
            selection: Selection::new(),
            history: History::new(config.history.max_size),
            keyboard: KeyboardNav::new(),
            constraints: config.constraints.clone(),
            announcements: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Accessors

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn keyboard(&self) -> &KeyboardNav {
        &self.keyboard
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn undo_state(&self) -> UndoRedoState {
        self.history.state()
    }

    /// Subscribe to history changes (see [`History::subscribe`])
    pub fn subscribe_history(
        &mut self,
        listener: impl FnMut(&UndoRedoState) + 'static,
    ) -> u64 {
        self.history.subscribe(listener)
    }

    /// Take all queued accessibility announcements
    pub fn drain_announcements(&mut self) -> Vec<String> {
        std::mem::take(&mut self.announcements)
    }

    fn announce(&mut self, text: impl Into<String>) {
        self.announcements.push(text.into());
    }

    // -----------------------------------------------------------------
    // The single normalized entry point

    /// Apply a validated move/reorder request, recording one action.
    /// Invalid requests (unknown key, locked column leaving the
    /// selected pane, no-op) return false and leave state untouched.
    pub fn apply_move(&mut self, request: &MoveRequest) -> bool {
        let key = request.column_key.as_str();
        if !self.catalog.contains(key) {
            return false;
        }
        let title = self.catalog.title(key).to_string();

        match request.op {
            MoveOp::Move => {
                let leaving_selected = request.from_pane == Pane::Selected;
                if leaving_selected && self.catalog.is_required(key) {
                    self.announce(format!("{title} is required and cannot be removed."));
                    return false;
                }
                if leaving_selected
                    && self.catalog.is_locked(key)
                    && !self.constraints.allow_locked_columns
                {
                    self.announce(format!("{title} is locked to the selected pane."));
                    return false;
                }

                let from = self.arrangement.snapshot();
                if !self.arrangement.move_key(
                    key,
                    request.from_pane,
                    request.to_pane,
                    request.to_index,
                ) {
                    return false;
                }
                let kind = if request.to_pane == Pane::Selected {
                    ActionKind::Add
                } else {
                    ActionKind::Remove
                };
                let verb = match kind {
                    ActionKind::Add => "add",
                    _ => "remove",
                };
                let to = self.arrangement.snapshot();
                self.record(Action::new(kind, format!("{verb} {title}"), from, to));
                true
            }
            MoveOp::Reorder => {
                // Trust the key over the carried index
                let Some(from_index) = self.arrangement.index_in_pane(Pane::Selected, key)
                else {
                    return false;
                };
                let to_index = request
                    .to_index
                    .min(self.arrangement.pane_len(Pane::Selected).saturating_sub(1));
                if from_index == to_index {
                    return false;
                }
                let from = self.arrangement.snapshot();
                self.arrangement.reorder_selected(from_index, to_index);
                let to = self.arrangement.snapshot();
                self.record(Action::new(
                    ActionKind::Reorder,
                    format!("reorder {title}"),
                    from,
                    to,
                ));
                true
            }
        }
    }

    /// Record an executed action and drop the now-stale marks
    fn record(&mut self, action: Action) {
        self.history.execute(&mut self.arrangement, action);
        self.selection.clear(None);
    }

    // -----------------------------------------------------------------
    // Bulk commands

    fn record_bulk(&mut self, outcome: &BulkOutcome) {
        if !outcome.success || outcome.affected.is_empty() {
            return;
        }
        let from = self.arrangement.snapshot();
        self.arrangement.set_selected_order(&outcome.new_visible);
        let to = self.arrangement.snapshot();
        let (kind, description) = match outcome.operation {
            BulkOp::SelectAll => (ActionKind::SelectAll, "select all columns".to_string()),
            BulkOp::ClearAll => (ActionKind::Clear, "clear selected columns".to_string()),
            op => (
                ActionKind::Bulk,
                format!("{} {} columns", op.label(), outcome.affected.len()),
            ),
        };
        self.record(Action::new(kind, description, from, to));
        self.announce(match outcome.operation {
            BulkOp::Remove | BulkOp::ClearAll => {
                format!("Removed {} columns.", outcome.affected.len())
            }
            _ => format!("Added {} columns.", outcome.affected.len()),
        });
    }

    pub fn bulk_add(&mut self, keys: &[String]) -> BulkOutcome {
        let outcome = bulk::bulk_add(
            keys,
            self.arrangement.selected(),
            &self.catalog,
            &self.constraints,
        );
        self.record_bulk(&outcome);
        outcome
    }

    pub fn bulk_remove(&mut self, keys: &[String]) -> BulkOutcome {
        let outcome = bulk::bulk_remove(
            keys,
            self.arrangement.selected(),
            &self.catalog,
            &self.constraints,
        );
        self.record_bulk(&outcome);
        outcome
    }

    pub fn select_all_columns(&mut self) -> BulkOutcome {
        let outcome = bulk::select_all(
            self.arrangement.selected(),
            &self.catalog,
            &self.constraints,
        );
        self.record_bulk(&outcome);
        outcome
    }

    pub fn clear_columns(&mut self) -> BulkOutcome {
        let outcome = bulk::clear_all(
            self.arrangement.selected(),
            &self.catalog,
            &self.constraints,
        );
        self.record_bulk(&outcome);
        outcome
    }

    pub fn category_select(&mut self, category: &str) -> BulkOutcome {
        let outcome = bulk::category_select(
            category,
            self.arrangement.selected(),
            &self.catalog,
            &self.constraints,
        );
        self.record_bulk(&outcome);
        outcome
    }

    /// Bulk-add the columns marked in the available pane, in pane order
    pub fn add_marked(&mut self) -> BulkOutcome {
        let keys = self
            .selection
            .keys_in_order(Pane::Available, self.arrangement.available());
        self.bulk_add(&keys)
    }

    /// Bulk-remove the columns marked in the selected pane, in pane order
    pub fn remove_marked(&mut self) -> BulkOutcome {
        let keys = self
            .selection
            .keys_in_order(Pane::Selected, self.arrangement.selected());
        self.bulk_remove(&keys)
    }

    // -----------------------------------------------------------------
    // Front ends

    /// Resolve a pointer drop. Returns true when a state change applied.
    pub fn handle_drop(&mut self, drag: &DragData, zone: &DropZone) -> bool {
        let target_pane = match zone {
            DropZone::Pane { pane } => *pane,
            DropZone::Insertion { .. } => Pane::Selected,
        };
        let target_len = self.arrangement.pane_len(target_pane);
        match drop_result(drag, zone, target_len) {
            Some(request) => self.apply_move(&request),
            None => false,
        }
    }

    /// Resolve a raw transfer string drop. Malformed payloads are a
    /// silent no-op.
    pub fn handle_drop_payload(&mut self, raw: &str, zone: &DropZone) -> bool {
        match DragData::parse(raw) {
            Some(drag) => self.handle_drop(&drag, zone),
            None => false,
        }
    }

    /// Feed one key event to the keyboard engine. Commits are applied,
    /// announcements and errors are queued. Returns true when a state
    /// change applied.
    pub fn handle_key(&mut self, key: KeyEvent, focus: Option<&Focus>) -> bool {
        let lengths = PaneLengths {
            available: self.arrangement.pane_len(Pane::Available),
            selected: self.arrangement.pane_len(Pane::Selected),
        };
        let events = self.keyboard.handle_key(key, focus, lengths);
        let mut applied = false;
        for event in events {
            match event {
                NavEvent::Announce(text) => self.announcements.push(text),
                NavEvent::Error(text) => self.announcements.push(text),
                NavEvent::Commit(request) => applied |= self.apply_move(&request),
                NavEvent::Cancelled => {}
            }
        }
        applied
    }

    // -----------------------------------------------------------------
    // History

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.arrangement);
        if done {
            self.selection.clear(None);
            self.announce("Undone.");
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.arrangement);
        if done {
            self.selection.clear(None);
            self.announce("Redone.");
        }
        done
    }

    /// Jump the history cursor (None = pristine). Best-effort as
    /// documented on [`History::jump_to`].
    pub fn jump_to(&mut self, target: Option<usize>) -> bool {
        let done = self.history.jump_to(&mut self.arrangement, target);
        self.selection.clear(None);
        done
    }
}
