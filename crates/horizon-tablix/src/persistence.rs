//! Persisted user sizes.
//!
//! User-committed row heights and column widths are stored by the stable
//! key of the item they were applied to, so they survive model updates and
//! scrolling. The store serializes to JSON:
//!
//! ```
//! use horizon_tablix::events::Dimension;
//! use horizon_tablix::persistence::SizePersistence;
//!
//! let mut sizes = SizePersistence::new();
//! sizes.set(Dimension::Column, "Sales", 120.0);
//! let json = sizes.to_json().unwrap();
//! let restored = SizePersistence::from_json(&json).unwrap();
//! assert_eq!(restored.get(Dimension::Column, "Sales"), Some(120.0));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use horizon_tablix_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TablixError};
use crate::events::Dimension;

/// User sizes keyed by item key, per dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizePersistence {
    #[serde(default)]
    rows: BTreeMap<String, f32>,
    #[serde(default)]
    columns: BTreeMap<String, f32>,
}

impl SizePersistence {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, dimension: Dimension) -> &BTreeMap<String, f32> {
        match dimension {
            Dimension::Row => &self.rows,
            Dimension::Column => &self.columns,
        }
    }

    fn map_mut(&mut self, dimension: Dimension) -> &mut BTreeMap<String, f32> {
        match dimension {
            Dimension::Row => &mut self.rows,
            Dimension::Column => &mut self.columns,
        }
    }

    /// The stored size for `key`, if any.
    pub fn get(&self, dimension: Dimension, key: &str) -> Option<f32> {
        self.map(dimension).get(key).copied()
    }

    /// Store a size. Non-finite or non-positive sizes are ignored.
    pub fn set(&mut self, dimension: Dimension, key: &str, size: f32) {
        if !size.is_finite() || size <= 0.0 {
            tracing::warn!(target: targets::PERSISTENCE, ?dimension, key, size, "ignoring invalid size");
            return;
        }
        self.map_mut(dimension).insert(key.to_owned(), size);
    }

    pub fn remove(&mut self, dimension: Dimension, key: &str) -> Option<f32> {
        self.map_mut(dimension).remove(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len() + self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut store: Self = serde_json::from_str(json)?;
        for map in [&mut store.rows, &mut store.columns] {
            map.retain(|_, size| size.is_finite() && *size > 0.0);
        }
        Ok(store)
    }

    /// Write the store to `path`.
    ///
    /// The document is written to a temporary file next to `path` and
    /// renamed over it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sizes".to_owned());
        let temp = path.with_file_name(format!(".{}.tmp.{}", file_name, std::process::id()));
        fs::write(&temp, json).map_err(|e| TablixError::persistence_io(&temp, e))?;
        if let Err(e) = fs::rename(&temp, path) {
            fs::remove_file(&temp).ok();
            return Err(TablixError::persistence_io(path, e));
        }
        tracing::debug!(target: targets::PERSISTENCE, path = %path.display(), entries = self.len(), "sizes saved");
        Ok(())
    }

    /// Read a store from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| TablixError::persistence_io(path, e))?;
        let store = Self::from_json(&json)?;
        tracing::debug!(target: targets::PERSISTENCE, path = %path.display(), entries = store.len(), "sizes loaded");
        Ok(store)
    }
}
