//! Bulk operation builders.
//!
//! Each builder is a pure function over `(requested keys, current
//! visible order, catalog, constraints)` producing a [`BulkOutcome`]
//! report. Nothing here mutates editor state — the editor turns a
//! successful outcome into a single recorded action.

use crate::model::{ColumnCatalog, Constraints};

/// Which user-facing bulk command produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOp {
    Add,
    Remove,
    SelectAll,
    ClearAll,
    CategorySelect,
}

impl BulkOp {
    pub fn label(self) -> &'static str {
        match self {
            BulkOp::Add => "add",
            BulkOp::Remove => "remove",
            BulkOp::SelectAll => "select all",
            BulkOp::ClearAll => "clear all",
            BulkOp::CategorySelect => "category select",
        }
    }
}

/// Report for a single bulk command.
///
/// With any hard error `success` is false, `new_visible` echoes the
/// input order untouched and every requested key lands in `skipped`.
/// An empty request collapses to success with zero affected columns.
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    pub success: bool,
    pub operation: BulkOp,
    /// Keys actually added/removed, in application order
    pub affected: Vec<String>,
    /// Requested keys that were not applied
    pub skipped: Vec<String>,
    /// Hard failures — the operation performed no mutation
    pub errors: Vec<String>,
    /// Soft notes (e.g. locked columns held in place)
    pub warnings: Vec<String>,
    /// The resulting selected order (input order when `success` is false)
    pub new_visible: Vec<String>,
}

impl BulkOutcome {
    fn failure(
        operation: BulkOp,
        requested: &[String],
        visible: &[String],
        errors: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        BulkOutcome {
            success: false,
            operation,
            affected: Vec::new(),
            skipped: requested.to_vec(),
            errors,
            warnings,
            new_visible: visible.to_vec(),
        }
    }
}

/// Validate a requested bulk mutation against the constraints.
/// Returns `(errors, warnings)`; any error makes the operation fail
/// without mutation.
pub fn validate_bulk(
    operation: BulkOp,
    to_add: &[String],
    to_remove: &[String],
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(max) = constraints.max_selections {
        let resulting = visible.len() + to_add.len() - to_remove.len().min(visible.len());
        if resulting > max {
            errors.push(format!(
                "cannot {}: would select {} columns (maximum {})",
                operation.label(),
                resulting,
                max
            ));
        }
    }

    for key in to_remove {
        if catalog.is_required(key) && !constraints.allow_required_columns {
            errors.push(format!(
                "cannot remove required column '{}'",
                catalog.title(key)
            ));
        } else if catalog.is_locked(key) && !constraints.allow_locked_columns {
            warnings.push(format!("column '{}' is locked", catalog.title(key)));
        }
    }

    (errors, warnings)
}

/// Add the requested keys to the end of the visible order.
/// Keys already visible or unknown to the catalog are skipped; the
/// rest append in request order.
pub fn bulk_add(
    keys: &[String],
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    let mut affected = Vec::new();
    let mut skipped = Vec::new();
    for key in keys {
        if !catalog.contains(key)
            || visible.iter().any(|k| k == key)
            || affected.iter().any(|k| k == key)
        {
            skipped.push(key.clone());
        } else {
            affected.push(key.clone());
        }
    }

    let (errors, warnings) =
        validate_bulk(BulkOp::Add, &affected, &[], visible, catalog, constraints);
    if !errors.is_empty() {
        return BulkOutcome::failure(BulkOp::Add, keys, visible, errors, warnings);
    }

    let mut new_visible = visible.to_vec();
    new_visible.extend(affected.iter().cloned());
    BulkOutcome {
        success: true,
        operation: BulkOp::Add,
        affected,
        skipped,
        errors,
        warnings,
        new_visible,
    }
}

/// Remove the requested keys from the visible order, preserving the
/// relative order of survivors. Locked columns are held in place with
/// a warning (unless allowed); non-visible keys are skipped silently;
/// removing a required column is a hard error (unless allowed).
pub fn bulk_remove(
    keys: &[String],
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    bulk_remove_as(BulkOp::Remove, keys, visible, catalog, constraints)
}

fn bulk_remove_as(
    operation: BulkOp,
    keys: &[String],
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    let mut affected = Vec::new();
    let mut skipped = Vec::new();
    let mut warnings = Vec::new();
    let mut required_hits = Vec::new();

    for key in keys {
        if !visible.iter().any(|k| k == key) {
            skipped.push(key.clone());
        } else if catalog.is_required(key) && !constraints.allow_required_columns {
            required_hits.push(key.clone());
        } else if catalog.is_locked(key) && !constraints.allow_locked_columns {
            warnings.push(format!("column '{}' is locked", catalog.title(key)));
            skipped.push(key.clone());
        } else if !affected.iter().any(|k| k == key) {
            affected.push(key.clone());
        }
    }

    if !required_hits.is_empty() {
        let errors = required_hits
            .iter()
            .map(|k| format!("cannot remove required column '{}'", catalog.title(k)))
            .collect();
        return BulkOutcome::failure(operation, keys, visible, errors, warnings);
    }

    let new_visible: Vec<String> = visible
        .iter()
        .filter(|k| !affected.iter().any(|a| a == *k))
        .cloned()
        .collect();
    BulkOutcome {
        success: true,
        operation,
        affected,
        skipped,
        errors: Vec::new(),
        warnings,
        new_visible,
    }
}

/// Add every available key (everything in the catalog not yet visible)
pub fn select_all(
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    let candidates: Vec<String> = catalog
        .keys()
        .filter(|k| !visible.iter().any(|v| v == *k))
        .map(String::from)
        .collect();
    let mut outcome = bulk_add(&candidates, visible, catalog, constraints);
    outcome.operation = BulkOp::SelectAll;
    outcome
}

/// Remove every visible key. Required columns are not candidates at
/// all (unless allowed); locked columns pass through the remove filter
/// so they surface as warnings.
pub fn clear_all(
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    let candidates: Vec<String> = visible
        .iter()
        .filter(|k| constraints.allow_required_columns || !catalog.is_required(k))
        .cloned()
        .collect();
    bulk_remove_as(BulkOp::ClearAll, &candidates, visible, catalog, constraints)
}

/// Add every catalog column whose category matches
pub fn category_select(
    category: &str,
    visible: &[String],
    catalog: &ColumnCatalog,
    constraints: &Constraints,
) -> BulkOutcome {
    let candidates = catalog.keys_in_category(category);
    let mut outcome = bulk_add(&candidates, visible, catalog, constraints);
    outcome.operation = BulkOp::CategorySelect;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use pretty_assertions::assert_eq;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::from_columns([
            Column::new("name", "Name").required(),
            Column::new("owner", "Owner").locked(),
            Column::new("rev", "Revenue").with_category("finance"),
            Column::new("cost", "Cost").with_category("finance"),
            Column::new("notes", "Notes"),
        ])
    }

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    // --- bulk_add ---

    #[test]
    fn test_add_appends_in_request_order() {
        let out = bulk_add(
            &keys(&["cost", "rev"]),
            &keys(&["name"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert_eq!(out.affected, keys(&["cost", "rev"]));
        assert_eq!(out.new_visible, keys(&["name", "cost", "rev"]));
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_add_skips_visible_unknown_and_duplicates() {
        let out = bulk_add(
            &keys(&["name", "rev", "rev", "bogus"]),
            &keys(&["name"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert_eq!(out.affected, keys(&["rev"]));
        assert_eq!(out.skipped, keys(&["name", "rev", "bogus"]));
    }

    #[test]
    fn test_add_empty_request_is_idempotent_success() {
        let visible = keys(&["name"]);
        let out = bulk_add(&[], &visible, &catalog(), &Constraints::default());
        assert!(out.success);
        assert!(out.affected.is_empty());
        assert_eq!(out.new_visible, visible);
    }

    #[test]
    fn test_add_max_selections_is_hard_error() {
        let constraints = Constraints {
            max_selections: Some(2),
            ..Default::default()
        };
        let requested = keys(&["rev", "cost"]);
        let out = bulk_add(&requested, &keys(&["name"]), &catalog(), &constraints);
        assert!(!out.success);
        assert_eq!(out.errors.len(), 1);
        assert!(out.affected.is_empty());
        assert_eq!(out.skipped, requested);
        assert_eq!(out.new_visible, keys(&["name"]));
    }

    // --- bulk_remove ---

    #[test]
    fn test_remove_preserves_survivor_order() {
        let out = bulk_remove(
            &keys(&["rev", "notes"]),
            &keys(&["rev", "name", "notes", "cost"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert_eq!(out.new_visible, keys(&["name", "cost"]));
    }

    #[test]
    fn test_remove_locked_is_skipped_with_warning() {
        let out = bulk_remove(
            &keys(&["owner", "rev"]),
            &keys(&["owner", "rev"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert_eq!(out.affected, keys(&["rev"]));
        assert_eq!(out.skipped, keys(&["owner"]));
        assert_eq!(out.warnings, vec!["column 'Owner' is locked"]);
        assert_eq!(out.new_visible, keys(&["owner"]));
    }

    #[test]
    fn test_remove_locked_allowed_by_constraint() {
        let constraints = Constraints {
            allow_locked_columns: true,
            ..Default::default()
        };
        let out = bulk_remove(&keys(&["owner"]), &keys(&["owner"]), &catalog(), &constraints);
        assert!(out.success);
        assert_eq!(out.affected, keys(&["owner"]));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_remove_required_is_hard_error() {
        let out = bulk_remove(
            &keys(&["name", "rev"]),
            &keys(&["name", "rev"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(!out.success);
        assert_eq!(out.errors, vec!["cannot remove required column 'Name'"]);
        // No mutation at all, even for the otherwise-removable key
        assert_eq!(out.new_visible, keys(&["name", "rev"]));
        assert_eq!(out.skipped, keys(&["name", "rev"]));
    }

    #[test]
    fn test_remove_not_visible_is_silent_skip() {
        let out = bulk_remove(
            &keys(&["cost"]),
            &keys(&["name"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert!(out.affected.is_empty());
        assert_eq!(out.skipped, keys(&["cost"]));
        assert!(out.warnings.is_empty());
    }

    // --- select_all / clear_all / category_select ---

    #[test]
    fn test_select_all_pulls_everything_available() {
        let out = select_all(&keys(&["rev"]), &catalog(), &Constraints::default());
        assert!(out.success);
        assert_eq!(out.operation, BulkOp::SelectAll);
        assert_eq!(
            out.new_visible,
            keys(&["rev", "name", "owner", "cost", "notes"])
        );
    }

    #[test]
    fn test_clear_all_keeps_required_and_locked() {
        let out = clear_all(
            &keys(&["name", "owner", "rev"]),
            &catalog(),
            &Constraints::default(),
        );
        assert!(out.success);
        assert_eq!(out.operation, BulkOp::ClearAll);
        assert_eq!(out.affected, keys(&["rev"]));
        assert_eq!(out.new_visible, keys(&["name", "owner"]));
        assert_eq!(out.warnings, vec!["column 'Owner' is locked"]);
    }

    #[test]
    fn test_clear_all_with_overrides_empties_the_pane() {
        let constraints = Constraints {
            allow_locked_columns: true,
            allow_required_columns: true,
            ..Default::default()
        };
        let out = clear_all(&keys(&["name", "owner", "rev"]), &catalog(), &constraints);
        assert!(out.success);
        assert!(out.new_visible.is_empty());
    }

    #[test]
    fn test_category_select_restricts_candidates() {
        let out = category_select("finance", &keys(&["rev"]), &catalog(), &Constraints::default());
        assert!(out.success);
        assert_eq!(out.operation, BulkOp::CategorySelect);
        assert_eq!(out.affected, keys(&["cost"]));
        assert_eq!(out.skipped, keys(&["rev"]));
    }

    #[test]
    fn test_category_select_unknown_category_is_noop() {
        let out = category_select("nope", &keys(&["rev"]), &catalog(), &Constraints::default());
        assert!(out.success);
        assert!(out.affected.is_empty());
        assert_eq!(out.new_visible, keys(&["rev"]));
    }
}
