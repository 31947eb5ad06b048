//! Assessment catalog: rows of named fields loaded once and read many times.
//!
//! A [`Catalog`] is an immutable snapshot. Reloading builds a new one and
//! swaps it in through [`CatalogHandle`]; nothing edits rows in place.

pub mod handle;
pub mod loader;

pub use handle::CatalogHandle;
pub use loader::compute_fingerprint;

use crate::error::SchemaError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical fields of a catalog row, independent of the CSV header spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Category,
    Description,
    Url,
    Duration,
    AdaptiveSupport,
    RemoteSupport,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Category,
        Field::Description,
        Field::Url,
        Field::Duration,
        Field::AdaptiveSupport,
        Field::RemoteSupport,
    ];

    /// Fields every row must carry before the catalog can be matched.
    pub const REQUIRED: [Field; 2] = [Field::Name, Field::Category];
}

/// Maps logical fields to the header names used by a particular catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub name: String,
    pub category: String,
    pub description: String,
    pub url: String,
    pub duration: String,
    pub adaptive_support: String,
    pub remote_support: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "Assessment Name".to_string(),
            category: "Test Type".to_string(),
            description: "Description".to_string(),
            url: "URL".to_string(),
            duration: "Duration (min)".to_string(),
            adaptive_support: "Adaptive Support".to_string(),
            remote_support: "Remote Support".to_string(),
        }
    }
}

impl ColumnMap {
    pub fn header(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Category => &self.category,
            Field::Description => &self.description,
            Field::Url => &self.url,
            Field::Duration => &self.duration,
            Field::AdaptiveSupport => &self.adaptive_support,
            Field::RemoteSupport => &self.remote_support,
        }
    }
}

/// One catalog row. Blank cells are stored as `None`.
///
/// Duration stays as the raw cell text; turning it into minutes is the
/// formatter's job, where bad values fall back to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub duration: Option<String>,
    pub adaptive_support: Option<String>,
    pub remote_support: Option<String>,
}

impl CatalogItem {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_duration(mut self, duration: &str) -> Self {
        self.duration = Some(duration.to_string());
        self
    }

    /// Name and category, if both are present.
    pub fn match_fields(&self) -> Option<(&str, &str)> {
        match (self.name.as_deref(), self.category.as_deref()) {
            (Some(name), Some(category)) => Some((name, category)),
            _ => None,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Category => self.category.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::Url => self.url.as_deref(),
            Field::Duration => self.duration.as_deref(),
            Field::AdaptiveSupport => self.adaptive_support.as_deref(),
            Field::RemoteSupport => self.remote_support.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    headers: Vec<String>,
    columns: ColumnMap,
    items: Vec<CatalogItem>,
    origin: String,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog directly from rows, declaring every column present.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let columns = ColumnMap::default();
        let headers = Field::ALL
            .iter()
            .map(|f| columns.header(*f).to_string())
            .collect();
        let fingerprint = compute_fingerprint(format!("{items:?}").as_bytes());
        Self::new(headers, columns, items, "memory".to_string(), fingerprint)
    }

    pub(crate) fn new(
        headers: Vec<String>,
        columns: ColumnMap,
        items: Vec<CatalogItem>,
        origin: String,
        fingerprint: String,
    ) -> Self {
        Self {
            headers,
            columns,
            items,
            origin,
            fingerprint,
            loaded_at: Utc::now(),
        }
    }

    /// Rows in source order.
    pub fn all_items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// SHA-256 of the source bytes, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// True when every named header exists in the source.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.headers.iter().any(|h| h == n))
    }

    pub fn has_fields(&self, fields: &[Field]) -> bool {
        self.missing_columns(fields).is_empty()
    }

    fn missing_columns(&self, fields: &[Field]) -> Vec<String> {
        fields
            .iter()
            .map(|f| self.columns.header(*f))
            .filter(|h| !self.has_columns(&[*h]))
            .map(str::to_string)
            .collect()
    }

    /// Checks that the catalog can be matched: required columns exist and no
    /// row leaves them blank.
    pub fn validate_for_matching(&self) -> Result<(), SchemaError> {
        let missing = self.missing_columns(&Field::REQUIRED);
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns { missing });
        }

        let rows: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.match_fields().is_none())
            .map(|(i, _)| i + 1)
            .collect();
        if !rows.is_empty() {
            return Err(SchemaError::IncompleteItems { rows });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_items_declares_all_columns() {
        let catalog = Catalog::from_items(vec![CatalogItem::new("Verify G+", "Cognitive")]);
        assert!(catalog.has_columns(&["Assessment Name", "Test Type", "Duration (min)"]));
        assert!(catalog.has_fields(&Field::ALL));
        assert!(catalog.validate_for_matching().is_ok());
    }

    #[test]
    fn has_columns_is_exact() {
        let catalog = Catalog::from_items(vec![]);
        assert!(!catalog.has_columns(&["assessment name"]));
        assert!(catalog.has_columns(&[]));
    }

    #[test]
    fn blank_required_cell_is_a_schema_error() {
        let mut orphan = CatalogItem::new("Orphan", "x");
        orphan.category = None;
        let catalog = Catalog::from_items(vec![CatalogItem::new("A", "B"), orphan]);
        assert_eq!(
            catalog.validate_for_matching(),
            Err(SchemaError::IncompleteItems { rows: vec![2] })
        );
    }

    #[test]
    fn items_keep_insertion_order() {
        let catalog = Catalog::from_items(vec![
            CatalogItem::new("Zeta", "Z"),
            CatalogItem::new("Alpha", "A"),
        ]);
        let names: Vec<_> = catalog.all_items().iter().filter_map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }
}
