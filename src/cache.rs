use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;

type Slot = Arc<Mutex<Option<Arc<Dataset>>>>;

/// Path-keyed cache so a session loads each dataset file at most once.
///
/// Each path owns a slot; callers racing on the same path wait on that slot
/// while the first one loads. A failed load leaves the slot empty.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
        self.get_or_load_with(path, |p| Dataset::load(p))
    }

    /// Like [`get_or_load`](Self::get_or_load) with a custom loader.
    pub fn get_or_load_with<F>(&self, path: impl AsRef<Path>, load: F) -> Result<Arc<Dataset>>
    where
        F: FnOnce(&Path) -> Result<Dataset>,
    {
        let path = path.as_ref();
        let slot = Arc::clone(
            self.slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(path.to_path_buf())
                .or_default(),
        );

        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = entry.as_ref() {
            return Ok(Arc::clone(hit));
        }
        let loaded = Arc::new(load(path)?);
        info!(path = %path.display(), "cached fire dataset");
        *entry = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Number of paths holding a loaded dataset.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
