//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{AuditLogRecord, Post};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("remote store returned status {status}: {body}")]
    Remote { status: u16, body: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// The remote posts table.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Every post, newest first by creation time.
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;
    async fn insert_post(&self, post: Post) -> Result<Post, RepoError>;
    async fn update_post(&self, post: Post) -> Result<Post, RepoError>;
    async fn delete_post(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError>;
    /// Most recent entries first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError>;
}
