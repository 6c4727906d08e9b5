//! Wiring of stores, repositories and services for one running site.

use std::{future::Future, num::NonZeroU32, path::PathBuf, sync::Arc};

use tracing::info;

use crate::application::admin::{
    audit::AdminAuditService, blog::AdminBlogService, content::AdminContentService,
};
use crate::application::blog::BlogService;
use crate::application::error::AppError;
use crate::application::repos::{AuditRepo, PostsRepo};
use crate::application::session::AdminSession;
use crate::cache::{BlogCache, ContentStore};
use crate::config::{DEFAULT_AUDIT_RECENT_LIMIT, DEFAULT_DOCTOR_PAGE_SIZE, Settings};
use crate::infra::content_file::{load_content, save_content};
use crate::infra::memory::{InMemoryAuditRepo, InMemoryPostsRepo};
use crate::infra::remote::RestPostsRepo;

const DOCTOR_PAGE_SIZE: NonZeroU32 =
    NonZeroU32::new(DEFAULT_DOCTOR_PAGE_SIZE).expect("non-zero");
const AUDIT_RECENT_LIMIT: NonZeroU32 =
    NonZeroU32::new(DEFAULT_AUDIT_RECENT_LIMIT).expect("non-zero");

/// Everything a front end needs: read models, admin services and the
/// session that names the acting admin.
pub struct SiteContext {
    pub content: Arc<ContentStore>,
    pub blog_cache: Arc<BlogCache>,
    pub blog: BlogService,
    pub audit: AdminAuditService,
    pub session: AdminSession,
    pub admin_content: AdminContentService,
    pub admin_blog: AdminBlogService,
    pub doctor_page_size: NonZeroU32,
    pub audit_recent_limit: NonZeroU32,
    content_file: Option<PathBuf>,
}

impl SiteContext {
    /// Build from settings. Without a configured backend the posts table is
    /// held in memory and seeded with the sample posts.
    pub async fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let posts_repo: Arc<dyn PostsRepo> = match RestPostsRepo::from_settings(&settings.backend)? {
            Some(remote) => {
                info!(
                    target = "application::site::from_settings",
                    table = %settings.backend.posts_table,
                    "using hosted posts table"
                );
                Arc::new(remote)
            }
            None => Arc::new(InMemoryPostsRepo::with_posts(
                crate::domain::posts::default_posts(),
            )),
        };
        let content = load_content(settings.content.file.as_deref()).await?;

        let mut context = Self::assemble(
            Arc::new(ContentStore::new(content)),
            posts_repo,
            Arc::new(InMemoryAuditRepo::default()),
            settings.blog.page_size,
        );
        context.doctor_page_size = settings.doctors.page_size;
        context.audit_recent_limit = settings.audit.recent_limit;
        context.content_file = settings.content.file.clone();
        Ok(context)
    }

    pub fn assemble(
        content: Arc<ContentStore>,
        posts_repo: Arc<dyn PostsRepo>,
        audit_repo: Arc<dyn AuditRepo>,
        blog_page_size: NonZeroU32,
    ) -> Self {
        let blog_cache = Arc::new(BlogCache::new(posts_repo));
        let audit = AdminAuditService::new(audit_repo);

        Self {
            blog: BlogService::new(blog_cache.clone(), content.clone(), blog_page_size),
            session: AdminSession::new(audit.clone()),
            admin_content: AdminContentService::new(content.clone(), audit.clone()),
            admin_blog: AdminBlogService::new(blog_cache.clone(), audit.clone()),
            doctor_page_size: DOCTOR_PAGE_SIZE,
            audit_recent_limit: AUDIT_RECENT_LIMIT,
            content_file: None,
            content,
            blog_cache,
            audit,
        }
    }

    /// Sign `actor` in, run `edit` as that admin, then sign out whether or
    /// not the edit succeeded. The edit's error wins over a logout error.
    pub async fn as_admin<T, F, Fut>(&self, actor: &str, edit: F) -> Result<T, AppError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.session.login(actor).await?;
        let result = match self.session.require_admin() {
            Ok(admin) => edit(admin).await,
            Err(err) => Err(err.into()),
        };
        let signed_out = self.session.logout().await;
        let value = result?;
        signed_out?;
        Ok(value)
    }

    /// Write the content tree back to the configured overrides file.
    pub async fn persist_content(&self) -> Result<Option<PathBuf>, AppError> {
        let Some(path) = self.content_file.as_ref() else {
            return Ok(None);
        };
        save_content(path, &self.content.snapshot()).await?;
        info!(
            target = "application::site::persist_content",
            path = %path.display(),
            "content saved"
        );
        Ok(Some(path.clone()))
    }
}
