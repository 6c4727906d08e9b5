//! Application services for the administrative surface.

pub mod audit;
pub mod blog;
pub mod content;
