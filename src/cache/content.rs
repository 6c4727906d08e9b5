use std::sync::RwLock;

use serde_json::Value;

use crate::domain::content::{ContentChange, ContentConfig, PathError};
use crate::domain::entities::Doctor;
use crate::domain::schedule::DoctorSchedules;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::content";

/// Process-owned content tree shared by readers and the admin writer.
/// Writes are last-write-wins.
pub struct ContentStore {
    config: RwLock<ContentConfig>,
}

impl ContentStore {
    pub fn new(config: ContentConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        rw_read(&self.config, SOURCE, "get").get(path).cloned()
    }

    /// Run `f` against the current tree.
    pub fn read<R>(&self, f: impl FnOnce(&ContentConfig) -> R) -> R {
        f(&*rw_read(&self.config, SOURCE, "read"))
    }

    pub fn snapshot(&self) -> ContentConfig {
        rw_read(&self.config, SOURCE, "snapshot").clone()
    }

    pub fn set(&self, path: &str, value: Value) -> Result<ContentChange, PathError> {
        rw_write(&self.config, SOURCE, "set").set(path, value)
    }

    /// Apply a read-modify-write under one write lock.
    pub fn update<R, E>(&self, f: impl FnOnce(&mut ContentConfig) -> Result<R, E>) -> Result<R, E> {
        f(&mut *rw_write(&self.config, SOURCE, "update"))
    }

    pub fn doctors(&self) -> Vec<Doctor> {
        self.read(ContentConfig::doctors)
    }

    pub fn schedules(&self) -> DoctorSchedules {
        self.read(ContentConfig::schedules)
    }

    /// Restore the tree, e.g. between tests.
    pub fn reset(&self, config: ContentConfig) {
        *rw_write(&self.config, SOURCE, "reset") = config;
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::new(ContentConfig::with_defaults())
    }
}
