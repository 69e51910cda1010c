use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One of the two item collections in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    /// Unselected pool (order is display-only)
    Available,
    /// Chosen columns, in display order
    Selected,
}

impl Pane {
    pub fn opposite(self) -> Pane {
        match self {
            Pane::Available => Pane::Selected,
            Pane::Selected => Pane::Available,
        }
    }

    /// Lowercase name used in announcements and drag payloads
    pub fn name(self) -> &'static str {
        match self {
            Pane::Available => "available",
            Pane::Selected => "selected",
        }
    }
}

/// A column definition from the host catalog.
///
/// Columns are supplied once at editor start and only ever referenced
/// by key afterwards; the editor never creates or destroys them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable key, unique within the catalog
    pub key: String,
    /// Display title
    pub title: String,
    /// Category tag, used only for bulk category selection
    #[serde(default)]
    pub category: Option<String>,
    /// Cannot leave the selected pane (may still be reordered within it)
    #[serde(default)]
    pub locked: bool,
    /// Cannot be removed from the selected pane at all
    #[serde(default)]
    pub required: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            title: title.into(),
            category: None,
            locked: false,
            required: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The column catalog, keyed by column key in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnCatalog {
    columns: IndexMap<String, Column>,
}

impl ColumnCatalog {
    pub fn new() -> Self {
        ColumnCatalog {
            columns: IndexMap::new(),
        }
    }

    /// Build a catalog from a list of columns. Later duplicates replace
    /// earlier ones; catalog I/O rejects duplicates before this point.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Self {
        let mut catalog = ColumnCatalog::new();
        for col in columns {
            catalog.columns.insert(col.key.clone(), col);
        }
        catalog
    }

    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    /// Display title for a key, falling back to the key itself
    pub fn title<'a>(&'a self, key: &'a str) -> &'a str {
        self.columns.get(key).map_or(key, |c| c.title.as_str())
    }

    pub fn is_locked(&self, key: &str) -> bool {
        self.columns.get(key).is_some_and(|c| c.locked)
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.columns.get(key).is_some_and(|c| c.required)
    }

    /// Keys whose category matches, in declaration order
    pub fn keys_in_category(&self, category: &str) -> Vec<String> {
        self.columns
            .values()
            .filter(|c| c.category.as_deref() == Some(category))
            .map(|c| c.key.clone())
            .collect()
    }
}
