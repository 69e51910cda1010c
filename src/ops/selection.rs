use std::collections::HashSet;

use crate::model::Pane;

/// Multi-select marks, one set per pane.
///
/// These are transient UI cursors, not committed state: every operation
/// is a total set mutation with no validation against the arrangement.
/// Callers reconcile marks against current pane membership before
/// building a bulk action, and clear them once an arrangement-changing
/// action executes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    available: HashSet<String>,
    selected: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    fn pane(&self, pane: Pane) -> &HashSet<String> {
        match pane {
            Pane::Available => &self.available,
            Pane::Selected => &self.selected,
        }
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut HashSet<String> {
        match pane {
            Pane::Available => &mut self.available,
            Pane::Selected => &mut self.selected,
        }
    }

    /// Replace the marks for one pane wholesale
    pub fn set(&mut self, pane: Pane, keys: impl IntoIterator<Item = String>) {
        *self.pane_mut(pane) = keys.into_iter().collect();
    }

    /// Toggle one key's mark
    pub fn toggle(&mut self, pane: Pane, key: &str) {
        let set = self.pane_mut(pane);
        if !set.remove(key) {
            set.insert(key.to_string());
        }
    }

    pub fn add(&mut self, pane: Pane, key: &str) {
        self.pane_mut(pane).insert(key.to_string());
    }

    pub fn remove(&mut self, pane: Pane, key: &str) {
        self.pane_mut(pane).remove(key);
    }

    /// Clear one pane's marks, or both when `pane` is None
    pub fn clear(&mut self, pane: Option<Pane>) {
        match pane {
            Some(p) => self.pane_mut(p).clear(),
            None => {
                self.available.clear();
                self.selected.clear();
            }
        }
    }

    /// Mark every given key in one pane (replacing existing marks)
    pub fn select_all(&mut self, pane: Pane, keys: impl IntoIterator<Item = String>) {
        self.set(pane, keys);
    }

    pub fn is_selected(&self, pane: Pane, key: &str) -> bool {
        self.pane(pane).contains(key)
    }

    /// Mark count for one pane, or both when `pane` is None
    pub fn count(&self, pane: Option<Pane>) -> usize {
        match pane {
            Some(p) => self.pane(p).len(),
            None => self.available.len() + self.selected.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.selected.is_empty()
    }

    /// Marked keys for a pane, in arbitrary order
    pub fn keys(&self, pane: Pane) -> impl Iterator<Item = &str> {
        self.pane(pane).iter().map(|k| k.as_str())
    }

    /// Marked keys for a pane, ordered by their position in `order`.
    /// Marks not present in `order` are dropped — this is the
    /// reconciliation step bulk builders rely on.
    pub fn keys_in_order(&self, pane: Pane, order: &[String]) -> Vec<String> {
        let set = self.pane(pane);
        order.iter().filter(|k| set.contains(*k)).cloned().collect()
    }
}
