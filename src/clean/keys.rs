//! Tag name canonicalization: raw exiftool names → snake_case.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::Result;
use crate::value::{MetadataMap, TagMap};

/// The column map shipped with the crate.
const DEFAULT_COLUMN_MAP: &str = include_str!("../../data/exif_column_map.json");

/// Static raw-name → canonical-name lookup table.
///
/// Loaded once and read-only afterwards. A name is "known" if it appears as
/// either a key (raw form) or a value (already canonical) in the table.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    forward: BTreeMap<String, String>,
    canonical: BTreeSet<String>,
}

impl ColumnMap {
    /// Load the table from a JSON file, or fall back to the embedded default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let raw = match path {
            Some(p) => std::fs::read_to_string(p)?,
            None => DEFAULT_COLUMN_MAP.to_string(),
        };
        let forward: BTreeMap<String, String> = serde_json::from_str(&raw)?;
        let canonical = forward.values().cloned().collect();
        Ok(Self { forward, canonical })
    }

    /// Look up the canonical name for a raw tag name.
    pub fn canonical_name(&self, raw: &str) -> Option<&str> {
        self.forward.get(raw).map(String::as_str)
    }

    /// Whether the name is already in canonical form.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.contains(name)
    }
}

/// Canonicalize every tag name in an extracted metadata map.
pub fn clean_keys(metadata: MetadataMap, columns: &ColumnMap) -> MetadataMap {
    metadata
        .into_iter()
        .map(|(path, record)| (path, rename_record(record, columns)))
        .collect()
}

fn rename_record(record: TagMap, columns: &ColumnMap) -> TagMap {
    record
        .into_iter()
        .map(|(key, value)| {
            let renamed = if let Some(mapped) = columns.canonical_name(&key) {
                mapped.to_string()
            } else if columns.is_canonical(&key) {
                key
            } else {
                log::warn!("No mapped name found for key \"{key}\", renaming heuristically");
                snake_case_tag(&key)
            };
            (renamed, value)
        })
        .collect()
}

/// Boundary-insertion fallback for tag names absent from the column map:
/// underscore before every non-initial uppercase letter, lowercase the
/// result, then collapse the `i_d` artifact (`LensID` → `lens_id`, not
/// `lens_i_d`).
pub fn snake_case_tag(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i > 0 && ch.is_uppercase() && !ch.is_ascii_digit() {
            out.push('_');
        }
        out.push(ch);
    }
    out.to_lowercase().replace("i_d", "id")
}
