use serde::{Deserialize, Serialize};

use super::column::Pane;

/// The full pane-membership state: the ordered selected keys plus the
/// available pool. Invariant: a key appears in exactly one pane, never
/// both, never twice within a pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrangement {
    selected: Vec<String>,
    available: Vec<String>,
}

/// A serializable point-in-time copy of an [`Arrangement`], sufficient
/// to reconstruct a transition without replaying business logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementSnapshot {
    pub selected: Vec<String>,
    pub available: Vec<String>,
}

impl Arrangement {
    /// Start with every key in the available pool, in catalog order
    pub fn new(available: impl IntoIterator<Item = String>) -> Self {
        Arrangement {
            selected: Vec::new(),
            available: available.into_iter().collect(),
        }
    }

    /// Start from an explicit split (e.g. a host-restored view)
    pub fn from_parts(selected: Vec<String>, available: Vec<String>) -> Self {
        Arrangement {
            selected,
            available,
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn pane_keys(&self, pane: Pane) -> &[String] {
        match pane {
            Pane::Available => &self.available,
            Pane::Selected => &self.selected,
        }
    }

    pub fn pane_len(&self, pane: Pane) -> usize {
        self.pane_keys(pane).len()
    }

    /// Which pane a key currently lives in
    pub fn pane_of(&self, key: &str) -> Option<Pane> {
        if self.selected.iter().any(|k| k == key) {
            Some(Pane::Selected)
        } else if self.available.iter().any(|k| k == key) {
            Some(Pane::Available)
        } else {
            None
        }
    }

    pub fn index_in_pane(&self, pane: Pane, key: &str) -> Option<usize> {
        self.pane_keys(pane).iter().position(|k| k == key)
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.pane_of(key) == Some(Pane::Selected)
    }

    /// Move a key from one pane to the other, inserting at `to_index`
    /// (clamped to the target length). Returns false if the key is not
    /// in `from` — the arrangement is left untouched.
    pub fn move_key(&mut self, key: &str, from: Pane, to: Pane, to_index: usize) -> bool {
        if from == to {
            return false;
        }
        let Some(cur) = self.index_in_pane(from, key) else {
            return false;
        };
        let key = match from {
            Pane::Available => self.available.remove(cur),
            Pane::Selected => self.selected.remove(cur),
        };
        let target = match to {
            Pane::Available => &mut self.available,
            Pane::Selected => &mut self.selected,
        };
        let idx = to_index.min(target.len());
        target.insert(idx, key);
        true
    }

    /// Reorder within the selected pane. `to_index` is clamped; a
    /// missing `from_index` is a no-op returning false.
    pub fn reorder_selected(&mut self, from_index: usize, to_index: usize) -> bool {
        if from_index >= self.selected.len() {
            return false;
        }
        let key = self.selected.remove(from_index);
        let idx = to_index.min(self.selected.len());
        self.selected.insert(idx, key);
        true
    }

    /// Replace the selected order wholesale, moving displaced keys back
    /// to the available pool and pulling newly selected keys out of it.
    /// Keys unknown to either pane are ignored.
    pub fn set_selected_order(&mut self, order: &[String]) {
        let mut new_selected = Vec::with_capacity(order.len());
        for key in order {
            if let Some(pos) = self.selected.iter().position(|k| k == key) {
                new_selected.push(self.selected.remove(pos));
            } else if let Some(pos) = self.available.iter().position(|k| k == key) {
                new_selected.push(self.available.remove(pos));
            }
        }
        // Anything left in the old selected order was dropped — return
        // it to the pool, preserving relative order.
        self.available.append(&mut self.selected);
        self.selected = new_selected;
    }

    pub fn snapshot(&self) -> ArrangementSnapshot {
        ArrangementSnapshot {
            selected: self.selected.clone(),
            available: self.available.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &ArrangementSnapshot) {
        self.selected = snapshot.selected.clone();
        self.available = snapshot.available.clone();
    }

    /// Debug check of the pane-exclusivity invariant
    #[cfg(test)]
    pub fn check_invariant(&self) -> bool {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        self.selected
            .iter()
            .chain(self.available.iter())
            .all(|k| seen.insert(k.as_str()))
    }
}
