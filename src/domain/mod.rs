//! Domain layer types and invariants.

pub mod appointments;
pub mod content;
pub mod doctors;
pub mod entities;
pub mod error;
pub mod images;
pub mod navigation;
pub mod posts;
pub mod schedule;
