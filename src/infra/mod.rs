//! Infrastructure adapters and runtime bootstrap.

pub mod content_file;
pub mod error;
pub mod memory;
pub mod remote;
pub mod telemetry;
