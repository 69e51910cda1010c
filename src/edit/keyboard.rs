//! Keyboard navigation engine.
//!
//! A finite-state machine giving a keyboard-only path to the same
//! [`MoveRequest`]s the pointer protocol produces:
//! `Select → Move | Reorder → (commit | cancel) → Select`.
//!
//! The engine never touches editor state itself — every transition is
//! reported as a list of [`NavEvent`]s, and every transition carries an
//! accessibility announcement describing the resulting state. The host
//! forwards announcements to its screen-reader channel; they are
//! fire-and-forget and never block the next transition.

use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Pane;

use super::drag::{MoveOp, MoveRequest};

/// Engine mode. `Select` is the pristine state: no column is picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Select,
    Move,
    Reorder,
}

/// The column currently focused by the host's list cursor
#[derive(Debug, Clone)]
pub struct Focus {
    pub column_key: String,
    pub title: String,
    pub pane: Pane,
    pub index: usize,
}

/// Current lengths of the two panes, for clamping the insertion index
#[derive(Debug, Clone, Copy)]
pub struct PaneLengths {
    pub available: usize,
    pub selected: usize,
}

impl PaneLengths {
    fn len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Available => self.available,
            Pane::Selected => self.selected,
        }
    }
}

/// What a key transition produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// Screen-reader text describing the resulting state
    Announce(String),
    /// A committed state-change request
    Commit(MoveRequest),
    /// The pending move was abandoned
    Cancelled,
    /// Rejected transition (e.g. reorder from the available pane);
    /// the engine stays in its prior mode
    Error(String),
}

/// Transient drag state while a column is picked up
#[derive(Debug, Clone)]
struct PendingMove {
    column_key: String,
    title: String,
    mode: NavMode,
    source_pane: Pane,
    source_index: usize,
    target_pane: Pane,
    insertion_index: usize,
}

/// The keyboard navigation engine. One per editor instance; reset to
/// pristine `Select` on every commit or cancel.
#[derive(Debug, Clone, Default)]
pub struct KeyboardNav {
    pending: Option<PendingMove>,
}

impl KeyboardNav {
    pub fn new() -> Self {
        KeyboardNav::default()
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn mode(&self) -> NavMode {
        self.pending.as_ref().map_or(NavMode::Select, |p| p.mode)
    }

    /// The column being moved, while active
    pub fn active_column(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.column_key.as_str())
    }

    /// Where the pending insertion would land: `(target pane, index)`
    pub fn insertion_point(&self) -> Option<(Pane, usize)> {
        self.pending
            .as_ref()
            .map(|p| (p.target_pane, p.insertion_index))
    }

    /// Largest legal insertion index for the pending move. In Move mode
    /// an item may land after the last target item; in Reorder mode the
    /// item is already one of the `len` items, so the last position is
    /// `len - 1`.
    fn valid_max(pending: &PendingMove, lengths: PaneLengths) -> usize {
        let len = lengths.len(pending.target_pane);
        match pending.mode {
            NavMode::Reorder => len.saturating_sub(1),
            _ => len,
        }
    }

    /// Feed one key event. `focus` is the host's current list cursor,
    /// used only to pick a column up from `Select` mode.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        focus: Option<&Focus>,
        lengths: PaneLengths,
    ) -> Vec<NavEvent> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => match self.pending.take() {
                None => self.pick_up(focus, lengths),
                Some(pending) => self.commit(pending, lengths),
            },
            KeyCode::Esc => self.cancel(),
            KeyCode::Up => self.adjust_insertion(-1, lengths),
            KeyCode::Down => self.adjust_insertion(1, lengths),
            KeyCode::Left => self.retarget(Pane::Available),
            KeyCode::Right => self.retarget(Pane::Selected),
            KeyCode::Tab => self.toggle_mode(lengths),
            KeyCode::Home => self.jump_insertion(true, lengths),
            KeyCode::End => self.jump_insertion(false, lengths),
            _ => Vec::new(),
        }
    }

    fn pick_up(&mut self, focus: Option<&Focus>, lengths: PaneLengths) -> Vec<NavEvent> {
        let Some(focus) = focus else {
            return Vec::new();
        };
        let target_pane = focus.pane.opposite();
        let pending = PendingMove {
            column_key: focus.column_key.clone(),
            title: focus.title.clone(),
            mode: NavMode::Move,
            source_pane: focus.pane,
            source_index: focus.index,
            target_pane,
            insertion_index: lengths.len(target_pane),
        };
        let announce = format!(
            "Moving {}. Target {} pane, position {} of {}. \
             Arrows adjust, Tab toggles reorder, Enter commits, Escape cancels.",
            pending.title,
            target_pane.name(),
            pending.insertion_index + 1,
            lengths.len(target_pane) + 1,
        );
        self.pending = Some(pending);
        vec![NavEvent::Announce(announce)]
    }

    fn commit(&mut self, pending: PendingMove, lengths: PaneLengths) -> Vec<NavEvent> {
        // Move mode retargeted back onto the source pane: within the
        // selected pane this is a reorder; within the available pane
        // there is nothing to commit (the pool is unordered).
        let same_pane = pending.target_pane == pending.source_pane;
        if same_pane && pending.source_pane == Pane::Available && pending.mode == NavMode::Move {
            return vec![
                NavEvent::Announce(format!("{} left in the available pane.", pending.title)),
                NavEvent::Cancelled,
            ];
        }

        let reorder = pending.mode == NavMode::Reorder || same_pane;
        let request = if reorder {
            let max = lengths.selected.saturating_sub(1);
            let mut to_index = pending.insertion_index.min(max);
            // Move-mode indexes count the item itself in the target
            if pending.mode == NavMode::Move && pending.insertion_index > pending.source_index {
                to_index = pending.insertion_index.saturating_sub(1).min(max);
            }
            MoveRequest {
                column_key: pending.column_key.clone(),
                from_pane: Pane::Selected,
                to_pane: Pane::Selected,
                from_index: pending.source_index,
                to_index,
                op: MoveOp::Reorder,
            }
        } else {
            MoveRequest {
                column_key: pending.column_key.clone(),
                from_pane: pending.source_pane,
                to_pane: pending.target_pane,
                from_index: pending.source_index,
                to_index: pending.insertion_index,
                op: MoveOp::Move,
            }
        };

        let announce = match request.op {
            MoveOp::Move => format!(
                "Moved {} to the {} pane, position {}.",
                pending.title,
                request.to_pane.name(),
                request.to_index + 1,
            ),
            MoveOp::Reorder => format!(
                "Reordered {} to position {}.",
                pending.title,
                request.to_index + 1,
            ),
        };
        vec![NavEvent::Announce(announce), NavEvent::Commit(request)]
    }

    fn cancel(&mut self) -> Vec<NavEvent> {
        if self.pending.take().is_none() {
            return Vec::new();
        }
        vec![
            NavEvent::Announce("Move cancelled.".to_string()),
            NavEvent::Cancelled,
        ]
    }

    fn adjust_insertion(&mut self, delta: i32, lengths: PaneLengths) -> Vec<NavEvent> {
        let Some(pending) = &mut self.pending else {
            return Vec::new();
        };
        let max = Self::valid_max(pending, lengths);
        let next = pending.insertion_index as i32 + delta;
        pending.insertion_index = next.clamp(0, max as i32) as usize;
        vec![NavEvent::Announce(format!(
            "Position {} of {} in the {} pane.",
            pending.insertion_index + 1,
            max + 1,
            pending.target_pane.name(),
        ))]
    }

    fn jump_insertion(&mut self, to_start: bool, lengths: PaneLengths) -> Vec<NavEvent> {
        let Some(pending) = &mut self.pending else {
            return Vec::new();
        };
        let max = Self::valid_max(pending, lengths);
        pending.insertion_index = if to_start { 0 } else { max };
        vec![NavEvent::Announce(format!(
            "Position {} of {} in the {} pane.",
            pending.insertion_index + 1,
            max + 1,
            pending.target_pane.name(),
        ))]
    }

    /// Left/Right: switch the target pane, Move mode only
    fn retarget(&mut self, target: Pane) -> Vec<NavEvent> {
        let Some(pending) = &mut self.pending else {
            return Vec::new();
        };
        if pending.mode != NavMode::Move {
            return Vec::new();
        }
        pending.target_pane = target;
        pending.insertion_index = 0;
        vec![NavEvent::Announce(format!(
            "Target {} pane, position 1.",
            target.name(),
        ))]
    }

    /// Tab: toggle Move ↔ Reorder. Only the selected pane is ordered,
    /// so reordering from the available pane is rejected.
    fn toggle_mode(&mut self, lengths: PaneLengths) -> Vec<NavEvent> {
        let Some(pending) = &mut self.pending else {
            return Vec::new();
        };
        match pending.mode {
            NavMode::Move => {
                if pending.source_pane != Pane::Selected {
                    return vec![NavEvent::Error(
                        "Only columns in the selected pane can be reordered.".to_string(),
                    )];
                }
                pending.mode = NavMode::Reorder;
                pending.target_pane = Pane::Selected;
                let max = Self::valid_max(pending, lengths);
                pending.insertion_index = pending.source_index.min(max);
                vec![NavEvent::Announce(format!(
                    "Reorder mode. Position {} of {}.",
                    pending.insertion_index + 1,
                    max + 1,
                ))]
            }
            NavMode::Reorder => {
                pending.mode = NavMode::Move;
                pending.target_pane = pending.source_pane.opposite();
                pending.insertion_index = lengths.len(pending.target_pane);
                vec![NavEvent::Announce(format!(
                    "Move mode. Target {} pane, position {}.",
                    pending.target_pane.name(),
                    pending.insertion_index + 1,
                ))]
            }
            NavMode::Select => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn focus(pane: Pane, index: usize) -> Focus {
        Focus {
            column_key: "rev".to_string(),
            title: "Revenue".to_string(),
            pane,
            index,
        }
    }

    fn lengths(available: usize, selected: usize) -> PaneLengths {
        PaneLengths {
            available,
            selected,
        }
    }

    fn commit_of(events: &[NavEvent]) -> Option<&MoveRequest> {
        events.iter().find_map(|e| match e {
            NavEvent::Commit(req) => Some(req),
            _ => None,
        })
    }

    #[test]
    fn test_enter_picks_up_with_end_of_target_default() {
        let mut nav = KeyboardNav::new();
        let events = nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 0)), lengths(3, 2));
        assert_eq!(nav.mode(), NavMode::Move);
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 2)));
        insta::assert_snapshot!(
            match &events[0] {
                NavEvent::Announce(s) => s.as_str(),
                _ => panic!("expected announcement"),
            },
            @"Moving Revenue. Target selected pane, position 3 of 3. Arrows adjust, Tab toggles reorder, Enter commits, Escape cancels."
        );
    }

    #[test]
    fn test_enter_without_focus_is_inert() {
        let mut nav = KeyboardNav::new();
        assert!(nav.handle_key(key(KeyCode::Enter), None, lengths(3, 2)).is_empty());
        assert!(!nav.is_active());
    }

    #[test]
    fn test_arrow_clamps_at_bounds() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 0)), lengths(3, 2));
        // At end-of-target (2); Down stays clamped
        nav.handle_key(key(KeyCode::Down), None, lengths(3, 2));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 2)));
        nav.handle_key(key(KeyCode::Up), None, lengths(3, 2));
        nav.handle_key(key(KeyCode::Up), None, lengths(3, 2));
        nav.handle_key(key(KeyCode::Up), None, lengths(3, 2));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 0)));
    }

    #[test]
    fn test_home_end_jump() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 0)), lengths(3, 4));
        nav.handle_key(key(KeyCode::Home), None, lengths(3, 4));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 0)));
        nav.handle_key(key(KeyCode::End), None, lengths(3, 4));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 4)));
    }

    #[test]
    fn test_commit_emits_move_request_and_resets() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 1)), lengths(3, 2));
        nav.handle_key(key(KeyCode::Up), None, lengths(3, 2));
        let events = nav.handle_key(key(KeyCode::Enter), None, lengths(3, 2));
        let req = commit_of(&events).unwrap();
        assert_eq!(req.op, MoveOp::Move);
        assert_eq!(req.from_pane, Pane::Available);
        assert_eq!(req.to_pane, Pane::Selected);
        assert_eq!(req.from_index, 1);
        assert_eq!(req.to_index, 1);
        assert!(!nav.is_active());
        assert_eq!(nav.mode(), NavMode::Select);
    }

    #[test]
    fn test_escape_cancels_to_pristine_select() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 0)), lengths(3, 2));
        let events = nav.handle_key(key(KeyCode::Esc), None, lengths(3, 2));
        assert!(events.contains(&NavEvent::Cancelled));
        assert!(!nav.is_active());
        // Esc in pristine select does nothing
        assert!(nav.handle_key(key(KeyCode::Esc), None, lengths(3, 2)).is_empty());
    }

    #[test]
    fn test_tab_reorder_rejected_from_available() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 0)), lengths(3, 2));
        let events = nav.handle_key(key(KeyCode::Tab), None, lengths(3, 2));
        assert!(matches!(events[0], NavEvent::Error(_)));
        // State stays in the prior mode
        assert_eq!(nav.mode(), NavMode::Move);
    }

    #[test]
    fn test_tab_toggles_reorder_from_selected() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Selected, 1)), lengths(3, 3));
        nav.handle_key(key(KeyCode::Tab), None, lengths(3, 3));
        assert_eq!(nav.mode(), NavMode::Reorder);
        // Reorder valid_max is len - 1
        nav.handle_key(key(KeyCode::End), None, lengths(3, 3));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 2)));
        // Toggle back to move retargets the opposite pane
        nav.handle_key(key(KeyCode::Tab), None, lengths(3, 3));
        assert_eq!(nav.mode(), NavMode::Move);
        assert_eq!(nav.insertion_point(), Some((Pane::Available, 3)));
    }

    #[test]
    fn test_reorder_commit() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Selected, 0)), lengths(3, 3));
        nav.handle_key(key(KeyCode::Tab), None, lengths(3, 3));
        nav.handle_key(key(KeyCode::End), None, lengths(3, 3));
        let events = nav.handle_key(key(KeyCode::Enter), None, lengths(3, 3));
        let req = commit_of(&events).unwrap();
        assert_eq!(req.op, MoveOp::Reorder);
        assert_eq!(req.from_index, 0);
        assert_eq!(req.to_index, 2);
    }

    #[test]
    fn test_retarget_left_right_move_mode_only() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Selected, 0)), lengths(3, 3));
        nav.handle_key(key(KeyCode::Right), None, lengths(3, 3));
        assert_eq!(nav.insertion_point(), Some((Pane::Selected, 0)));
        nav.handle_key(key(KeyCode::Left), None, lengths(3, 3));
        assert_eq!(nav.insertion_point(), Some((Pane::Available, 0)));
        // Ignored in reorder mode
        nav.handle_key(key(KeyCode::Tab), None, lengths(3, 3));
        nav.handle_key(key(KeyCode::Tab), None, lengths(3, 3));
        assert_eq!(nav.mode(), NavMode::Move);
    }

    #[test]
    fn test_move_retargeted_to_selected_source_commits_reorder() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Selected, 2)), lengths(3, 4));
        nav.handle_key(key(KeyCode::Right), None, lengths(3, 4));
        // Insertion gap 0 in a 4-item list the column already occupies
        let events = nav.handle_key(key(KeyCode::Enter), None, lengths(3, 4));
        let req = commit_of(&events).unwrap();
        assert_eq!(req.op, MoveOp::Reorder);
        assert_eq!(req.to_index, 0);
    }

    #[test]
    fn test_move_retargeted_to_available_source_is_noop_commit() {
        let mut nav = KeyboardNav::new();
        nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Available, 1)), lengths(3, 2));
        nav.handle_key(key(KeyCode::Left), None, lengths(3, 2));
        let events = nav.handle_key(key(KeyCode::Enter), None, lengths(3, 2));
        assert!(commit_of(&events).is_none());
        assert!(events.contains(&NavEvent::Cancelled));
        assert!(!nav.is_active());
    }

    #[test]
    fn test_every_transition_announces() {
        let mut nav = KeyboardNav::new();
        let sequences = [
            nav.handle_key(key(KeyCode::Enter), Some(&focus(Pane::Selected, 1)), lengths(2, 3)),
            nav.handle_key(key(KeyCode::Up), None, lengths(2, 3)),
            nav.handle_key(key(KeyCode::Tab), None, lengths(2, 3)),
            nav.handle_key(key(KeyCode::Home), None, lengths(2, 3)),
            nav.handle_key(key(KeyCode::Enter), None, lengths(2, 3)),
        ];
        for events in &sequences {
            assert!(
                events
                    .iter()
                    .any(|e| matches!(e, NavEvent::Announce(_) | NavEvent::Error(_))),
                "transition without announcement: {events:?}"
            );
        }
    }
}
