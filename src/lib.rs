//! Content core for the CareWell Hospital website.
//!
//! The crate owns the site content tree (read and written through dotted
//! paths), the blog post cache kept in sync with the hosted posts table,
//! doctor schedules, and the append-only audit trail of admin actions.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
