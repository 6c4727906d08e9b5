use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::RepoError;
use crate::cache::BlogCache;
use crate::domain::entities::{ImageRef, Post};
use crate::domain::error::{DomainError, ensure_non_empty};

#[derive(Debug, Error)]
pub enum AdminBlogError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    /// Left empty to have an id generated.
    pub id: String,
    pub title: String,
    pub category: String,
    pub featured: bool,
    pub excerpt: String,
    pub content: String,
    pub image: ImageRef,
    pub author: String,
    pub date: String,
}

impl PostDraft {
    fn into_post(self, id: String) -> Post {
        Post {
            id,
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            featured: self.featured,
            excerpt: self.excerpt,
            content: self.content,
            image: self.image,
            author: self.author,
            date: self.date,
            created_at: None,
        }
    }
}

/// Post writes from the admin panel. Every write goes through the blog cache
/// so the served list is refreshed afterwards.
#[derive(Clone)]
pub struct AdminBlogService {
    cache: Arc<BlogCache>,
    audit: AdminAuditService,
}

impl AdminBlogService {
    pub fn new(cache: Arc<BlogCache>, audit: AdminAuditService) -> Self {
        Self { cache, audit }
    }

    pub async fn create_post(&self, actor: &str, draft: PostDraft) -> Result<Post, AdminBlogError> {
        validate(&draft)?;
        let id = match draft.id.trim() {
            "" => generate_post_id(),
            id => id.to_string(),
        };

        let post = self.cache.create(draft.into_post(id)).await?;
        self.audit
            .record(actor, "post.create", Some(&format!("Created post {}", post.id)))
            .await?;
        Ok(post)
    }

    pub async fn update_post(&self, actor: &str, draft: PostDraft) -> Result<Post, AdminBlogError> {
        ensure_non_empty(&draft.id, "id")?;
        validate(&draft)?;
        let id = draft.id.trim().to_string();

        let post = self.cache.update(draft.into_post(id)).await?;
        self.audit
            .record(actor, "post.update", Some(&format!("Updated post {}", post.id)))
            .await?;
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &str, id: &str) -> Result<(), AdminBlogError> {
        ensure_non_empty(id, "id")?;
        self.cache.delete(id).await?;
        self.audit
            .record(actor, "post.delete", Some(&format!("Deleted post {id}")))
            .await?;
        Ok(())
    }
}

fn validate(draft: &PostDraft) -> Result<(), DomainError> {
    ensure_non_empty(&draft.title, "title")?;
    ensure_non_empty(&draft.category, "category")
}

fn generate_post_id() -> String {
    format!("post_{}", Uuid::new_v4().simple())
}
