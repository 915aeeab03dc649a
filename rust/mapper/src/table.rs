// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External lookup table: metadata field -> value -> material name.
//!
//! Parsed from a delimited text file, one rule per line after a header
//! line. Columns are material name, field name, then one or more value
//! cells that all map to the same material.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::Result;

/// Field -> value -> material lookup
#[derive(Debug, Default)]
pub struct MaterialTable {
    by_field: FxHashMap<String, FxHashMap<String, String>>,
}

impl MaterialTable {
    /// Load and parse a table file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse table text. The first line is a header and is skipped.
    ///
    /// Empty field or value cells are ignored. A value seen twice under
    /// the same field keeps its first material; later mappings are warned
    /// about and dropped.
    pub fn parse(content: &str) -> Self {
        let mut by_field: FxHashMap<String, FxHashMap<String, String>> = FxHashMap::default();

        for line in content.lines().skip(1) {
            let mut cells = line.split(',');
            let material = cells.next().unwrap_or("").trim();
            let field = cells.next().unwrap_or("").trim();
            if field.is_empty() {
                continue;
            }
            let values = by_field.entry(field.to_string()).or_default();
            for cell in cells {
                let value = cell.trim();
                if value.is_empty() {
                    continue;
                }
                if values.contains_key(value) {
                    tracing::warn!(field, value, "value is mapped to multiple materials; keeping the first");
                    continue;
                }
                values.insert(value.to_string(), material.to_string());
            }
        }

        Self { by_field }
    }

    /// Look up the material a field/value pair maps to
    pub fn material_for(&self, field: &str, value: &str) -> Option<&str> {
        self.by_field.get(field)?.get(value).map(String::as_str)
    }

    /// True when no rule carries a value cell
    pub fn is_empty(&self) -> bool {
        self.by_field.values().all(FxHashMap::is_empty)
    }

    /// Iterate every (field, value, material) rule
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.by_field.iter().flat_map(|(field, values)| {
            values
                .iter()
                .map(move |(value, material)| (field.as_str(), value.as_str(), material.as_str()))
        })
    }
}
