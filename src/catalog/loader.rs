use super::{Catalog, CatalogItem, ColumnMap, Field};
use crate::error::LoadError;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Read a headered CSV catalog from disk.
    pub fn load(path: &Path, columns: &ColumnMap) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_csv_bytes(&bytes, &path.display().to_string(), columns)?;
        info!(
            path = %path.display(),
            items = catalog.len(),
            fingerprint = %&catalog.fingerprint()[..12],
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse CSV bytes. `origin` only labels errors and the snapshot.
    pub fn from_csv_bytes(bytes: &[u8], origin: &str, columns: &ColumnMap) -> Result<Self, LoadError> {
        let malformed = |source| LoadError::Malformed {
            origin: origin.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_string)
            .collect();

        let positions: Vec<(Field, Option<usize>)> = Field::ALL
            .iter()
            .map(|f| (*f, headers.iter().position(|h| h == columns.header(*f))))
            .collect();
        let absent: Vec<&str> = positions
            .iter()
            .filter(|(_, pos)| pos.is_none())
            .map(|(f, _)| columns.header(*f))
            .collect();
        if !absent.is_empty() {
            debug!(origin, ?absent, "Catalog lacks columns");
        }

        let mut items = Vec::new();
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            let mut item = CatalogItem::default();
            for (field, pos) in &positions {
                let value = pos
                    .and_then(|i| record.get(i))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
                set_field(&mut item, *field, value);
            }
            items.push(item);
        }

        Ok(Self::new(
            headers,
            columns.clone(),
            items,
            origin.to_string(),
            compute_fingerprint(bytes),
        ))
    }

    pub fn from_csv_str(text: &str, columns: &ColumnMap) -> Result<Self, LoadError> {
        Self::from_csv_bytes(text.as_bytes(), "inline", columns)
    }
}

fn set_field(item: &mut CatalogItem, field: Field, value: Option<String>) {
    let slot = match field {
        Field::Name => &mut item.name,
        Field::Category => &mut item.category,
        Field::Description => &mut item.description,
        Field::Url => &mut item.url,
        Field::Duration => &mut item.duration,
        Field::AdaptiveSupport => &mut item.adaptive_support,
        Field::RemoteSupport => &mut item.remote_support,
    };
    *slot = value;
}

pub fn compute_fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
