//! Application services layer: read models, admin services and the session.

pub mod admin;
pub mod blog;
pub mod error;
pub mod pagination;
pub mod repos;
pub mod session;
pub mod site;
