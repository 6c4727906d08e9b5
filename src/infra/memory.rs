//! In-process repositories used offline and in tests.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::application::repos::{AuditRepo, PostsRepo, RepoError};
use crate::cache::lock::mutex_lock;
use crate::domain::entities::{AuditLogRecord, Post};

const SOURCE: &str = "infra::memory";

/// Posts table kept newest-first.
#[derive(Default)]
pub struct InMemoryPostsRepo {
    posts: Mutex<Vec<Post>>,
    failing: AtomicBool,
}

impl InMemoryPostsRepo {
    /// Seed with `posts`, already ordered newest first.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every call fail, simulating an unreachable backend.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.posts, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), RepoError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::Persistence("backend unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for InMemoryPostsRepo {
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError> {
        self.check_available()?;
        Ok(mutex_lock(&self.posts, SOURCE, "list_posts").clone())
    }

    async fn insert_post(&self, mut post: Post) -> Result<Post, RepoError> {
        self.check_available()?;
        let mut posts = mutex_lock(&self.posts, SOURCE, "insert_post");
        if posts.iter().any(|existing| existing.id == post.id) {
            return Err(RepoError::InvalidInput {
                message: format!("post `{}` already exists", post.id),
            });
        }
        if post.created_at.is_none() {
            post.created_at = OffsetDateTime::now_utc().format(&Rfc3339).ok();
        }
        posts.insert(0, post.clone());
        Ok(post)
    }

    async fn update_post(&self, post: Post) -> Result<Post, RepoError> {
        self.check_available()?;
        let mut posts = mutex_lock(&self.posts, SOURCE, "update_post");
        let slot = posts
            .iter_mut()
            .find(|existing| existing.id == post.id)
            .ok_or(RepoError::NotFound)?;
        let created_at = slot.created_at.take();
        *slot = Post {
            created_at: post.created_at.clone().or(created_at),
            ..post
        };
        Ok(slot.clone())
    }

    async fn delete_post(&self, id: &str) -> Result<(), RepoError> {
        self.check_available()?;
        let mut posts = mutex_lock(&self.posts, SOURCE, "delete_post");
        let before = posts.len();
        posts.retain(|existing| existing.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Append-only audit log. The mutex serializes concurrent writers; append
/// order is the log order.
#[derive(Default)]
pub struct InMemoryAuditRepo {
    entries: Mutex<Vec<AuditLogRecord>>,
}

impl InMemoryAuditRepo {
    pub fn entries(&self) -> Vec<AuditLogRecord> {
        mutex_lock(&self.entries, SOURCE, "entries").clone()
    }
}

#[async_trait]
impl AuditRepo for InMemoryAuditRepo {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        mutex_lock(&self.entries, SOURCE, "append_log").push(record);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let entries = mutex_lock(&self.entries, SOURCE, "list_recent");
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::default_posts;

    #[tokio::test]
    async fn insert_puts_newest_first_and_stamps_creation() {
        let repo = InMemoryPostsRepo::with_posts(default_posts());
        let mut post = default_posts().remove(1);
        post.id = "post_3".into();

        let stored = repo.insert_post(post).await.expect("insert");
        assert!(stored.created_at.is_some());

        let listed = repo.list_posts().await.expect("list");
        assert_eq!(listed[0].id, "post_3");
        assert_eq!(listed.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_and_missing_ids_are_rejected() {
        let repo = InMemoryPostsRepo::with_posts(default_posts());
        let duplicate = default_posts().remove(0);
        assert!(matches!(
            repo.insert_post(duplicate).await,
            Err(RepoError::InvalidInput { .. })
        ));

        let mut ghost = default_posts().remove(0);
        ghost.id = "ghost".into();
        assert!(matches!(
            repo.update_post(ghost).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repo.delete_post("ghost").await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failing_repo_rejects_every_call() {
        let repo = InMemoryPostsRepo::default();
        repo.set_failing(true);
        assert!(repo.list_posts().await.is_err());
        repo.set_failing(false);
        assert!(repo.list_posts().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn audit_lists_most_recent_first() {
        let repo = InMemoryAuditRepo::default();
        for action in ["login", "content.update", "logout"] {
            repo.append_log(AuditLogRecord {
                id: uuid::Uuid::new_v4(),
                actor: "admin".into(),
                action: action.into(),
                detail: None,
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .expect("append");
        }

        let recent = repo.list_recent(2).await.expect("recent");
        let actions: Vec<_> = recent.iter().map(|entry| entry.action.clone()).collect();
        assert_eq!(actions, vec!["logout", "content.update"]);
        assert_eq!(repo.entries().len(), 3);
    }
}
