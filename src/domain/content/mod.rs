//! The site content tree and its path resolver.
//!
//! Reads never fail: an unparsable path or a missing segment is simply
//! absent. Writes replace the value at a path in place, create missing
//! mapping nodes on the way down, and refuse to grow sequences or to descend
//! through scalars.

mod defaults;
mod path;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::entities::{Doctor, Specialty};
use super::images::ImageArea;
use super::schedule::DoctorSchedules;

pub use defaults::default_content;
pub use path::{ContentPath, PathError, Segment};

pub const DOCTORS_PATH: &str = "doctors";
pub const SCHEDULES_PATH: &str = "doctor_schedules";
pub const SPECIALTIES_PATH: &str = "specialties";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("failed to encode value for `{path}`: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("content at `{path}` has unexpected shape: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a successful write, kept for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentChange {
    pub path: String,
    pub previous: Option<Value>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentConfig {
    root: Value,
}

impl ContentConfig {
    pub fn new(root: Map<String, Value>) -> Self {
        Self {
            root: Value::Object(root),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_content())
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Overlay `overrides` onto the tree, replacing each top-level area it names.
    pub fn merge_areas(&mut self, overrides: Map<String, Value>) {
        if let Value::Object(root) = &mut self.root {
            root.extend(overrides);
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        match ContentPath::parse(path) {
            Ok(parsed) => self.get_at(&parsed),
            Err(err) => {
                debug!(path, error = %err, "content lookup with unparsable path");
                None
            }
        }
    }

    pub fn get_at(&self, path: &ContentPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| child(node, segment))
    }

    /// Typed read. A value of the wrong shape reads as absent.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.get(path)?;
        match T::deserialize(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                debug!(path, error = %err, "content value has unexpected shape");
                None
            }
        }
    }

    /// Strict typed read for read-modify-write callers. An absent value is
    /// `T::default()`; a value of the wrong shape is an error.
    pub fn try_get_as<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, ContentError> {
        let Some(value) = self.get(path) else {
            return Ok(T::default());
        };
        T::deserialize(value).map_err(|source| ContentError::Decode {
            path: path.to_string(),
            source,
        })
    }

    pub fn set(&mut self, path: &str, value: Value) -> Result<ContentChange, PathError> {
        let parsed = ContentPath::parse(path)?;
        self.set_at(&parsed, value)
    }

    pub fn set_at(&mut self, path: &ContentPath, value: Value) -> Result<ContentChange, PathError> {
        let (last, parents) = path.segments().split_last().ok_or(PathError::Empty)?;

        let mut node = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            node = descend_or_create(node, segment, || path.prefix(depth))?;
        }
        let previous = assign(node, last, value, || path.prefix(parents.len()))?;

        let rendered = path.to_string();
        Ok(ContentChange {
            description: format!("Updated {rendered}"),
            path: rendered,
            previous,
        })
    }

    /// Serialize `value` and write it at `path`.
    pub fn set_typed<T: Serialize>(
        &mut self,
        path: &str,
        value: &T,
    ) -> Result<ContentChange, ContentError> {
        let encoded = serde_json::to_value(value).map_err(|source| ContentError::Encode {
            path: path.to_string(),
            source,
        })?;
        Ok(self.set(path, encoded)?)
    }

    pub fn doctors(&self) -> Vec<Doctor> {
        self.get_as(DOCTORS_PATH).unwrap_or_default()
    }

    pub fn try_doctors(&self) -> Result<Vec<Doctor>, ContentError> {
        self.try_get_as(DOCTORS_PATH)
    }

    pub fn set_doctors(&mut self, doctors: &[Doctor]) -> Result<ContentChange, ContentError> {
        self.set_typed(DOCTORS_PATH, &doctors)
    }

    pub fn specialties(&self) -> Vec<Specialty> {
        self.get_as(SPECIALTIES_PATH).unwrap_or_default()
    }

    /// Entries of `images.<area>`; non-string entries are skipped.
    pub fn image_table(&self, area: ImageArea) -> Vec<String> {
        self.get(&format!("images.{}", area.as_str()))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn schedules(&self) -> DoctorSchedules {
        self.get_as(SCHEDULES_PATH).unwrap_or_default()
    }

    pub fn try_schedules(&self) -> Result<DoctorSchedules, ContentError> {
        self.try_get_as(SCHEDULES_PATH)
    }

    pub fn set_schedules(
        &mut self,
        schedules: &DoctorSchedules,
    ) -> Result<ContentChange, ContentError> {
        self.set_typed(SCHEDULES_PATH, schedules)
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn child<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(&segment.as_key()),
        Value::Array(items) => segment.as_index().and_then(|index| items.get(index)),
        _ => None,
    }
}

fn descend_or_create<'a>(
    node: &'a mut Value,
    segment: &Segment,
    at: impl Fn() -> String,
) -> Result<&'a mut Value, PathError> {
    let slot = match node {
        Value::Object(map) => map.entry(segment.as_key()).or_insert(Value::Null),
        Value::Array(items) => {
            let len = items.len();
            let index = segment.as_index().ok_or_else(|| PathError::NotAnIndex {
                at: at(),
                segment: segment.as_key(),
            })?;
            items.get_mut(index).ok_or_else(|| PathError::OutOfRange {
                at: at(),
                index,
                len,
            })?
        }
        _ => {
            return Err(PathError::NotContainer {
                at: at(),
                segment: segment.as_key(),
            });
        }
    };

    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    Ok(slot)
}

fn assign(
    node: &mut Value,
    segment: &Segment,
    value: Value,
    at: impl Fn() -> String,
) -> Result<Option<Value>, PathError> {
    match node {
        Value::Object(map) => Ok(map.insert(segment.as_key(), value)),
        Value::Array(items) => {
            let len = items.len();
            let index = segment.as_index().ok_or_else(|| PathError::NotAnIndex {
                at: at(),
                segment: segment.as_key(),
            })?;
            let slot = items
                .get_mut(index)
                .ok_or_else(|| PathError::OutOfRange { at: at(), index, len })?;
            Ok(Some(std::mem::replace(slot, value)))
        }
        _ => Err(PathError::NotContainer {
            at: at(),
            segment: segment.as_key(),
        }),
    }
}
