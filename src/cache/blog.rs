//! Blog post cache synchronized with the remote posts table.
//!
//! The cache is either `Stale` (never fetched successfully) or `Populated`
//! with the last good list. Reads never touch the network: they return the
//! populated list, or the built-in sample posts while stale. Writes go to the
//! remote table and are followed by a full refresh, so readers may see the
//! pre-write list until that refresh lands.
//!
//! Every fetch takes a generation number when it starts. A result is applied
//! only if no later fetch has been applied already, so a slow response can
//! never replace a newer list.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

use metrics::counter;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::Post;
use crate::domain::posts::{default_posts, find_by_id};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::blog";

#[derive(Debug, Clone)]
pub enum CacheState {
    Stale,
    Populated {
        posts: Arc<Vec<Post>>,
        refreshed_at: OffsetDateTime,
    },
}

pub struct BlogCache {
    repo: Arc<dyn PostsRepo>,
    defaults: Arc<Vec<Post>>,
    state: RwLock<CacheState>,
    issued: AtomicU64,
    // Only read or written while the state write lock is held.
    applied: AtomicU64,
}

impl BlogCache {
    pub fn new(repo: Arc<dyn PostsRepo>) -> Self {
        Self::with_defaults(repo, default_posts())
    }

    pub fn with_defaults(repo: Arc<dyn PostsRepo>, defaults: Vec<Post>) -> Self {
        Self {
            repo,
            defaults: Arc::new(defaults),
            state: RwLock::new(CacheState::Stale),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> CacheState {
        rw_read(&self.state, SOURCE, "state").clone()
    }

    pub fn is_populated(&self) -> bool {
        matches!(
            *rw_read(&self.state, SOURCE, "is_populated"),
            CacheState::Populated { .. }
        )
    }

    /// Current posts without waiting on the network.
    pub fn read_sync(&self) -> Arc<Vec<Post>> {
        match &*rw_read(&self.state, SOURCE, "read_sync") {
            CacheState::Populated { posts, .. } => Arc::clone(posts),
            CacheState::Stale => {
                counter!("carewell_blog_default_served_total").increment(1);
                Arc::clone(&self.defaults)
            }
        }
    }

    /// Same list as [`BlogCache::read_sync`]; the name view code reads by.
    pub fn snapshot(&self) -> Arc<Vec<Post>> {
        self.read_sync()
    }

    pub fn get_post_by_id(&self, id: &str) -> Option<Post> {
        find_by_id(&self.read_sync(), id).cloned()
    }

    /// Pull the full list from the posts table. On failure the state is left
    /// untouched and the cached (or default) list is returned instead. A
    /// result overtaken by a later fetch is dropped and the newer list returned.
    pub async fn fetch(&self) -> Arc<Vec<Post>> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        match self.repo.list_posts().await {
            Ok(posts) => {
                let posts = Arc::new(posts);
                {
                    let mut state = rw_write(&self.state, SOURCE, "fetch");
                    if generation > self.applied.load(Ordering::SeqCst) {
                        self.applied.store(generation, Ordering::SeqCst);
                        *state = CacheState::Populated {
                            posts: Arc::clone(&posts),
                            refreshed_at: OffsetDateTime::now_utc(),
                        };
                        counter!("carewell_blog_refresh_total").increment(1);
                        debug!(
                            target = "cache::blog::fetch",
                            generation,
                            count = posts.len(),
                            "blog cache refreshed"
                        );
                        return posts;
                    }
                }
                counter!("carewell_blog_refresh_superseded_total").increment(1);
                debug!(
                    target = "cache::blog::fetch",
                    generation,
                    applied = self.applied.load(Ordering::SeqCst),
                    "discarding fetch overtaken by a newer one"
                );
                self.read_sync()
            }
            Err(err) => {
                counter!("carewell_blog_refresh_failure_total").increment(1);
                warn!(
                    target = "cache::blog::fetch",
                    error = %err,
                    populated = self.is_populated(),
                    "blog refresh failed, serving cached posts"
                );
                self.read_sync()
            }
        }
    }

    pub async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let result = self.repo.insert_post(post).await;
        self.refresh_after("create", result.as_ref().err()).await;
        result
    }

    pub async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let result = self.repo.update_post(post).await;
        self.refresh_after("update", result.as_ref().err()).await;
        result
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let result = self.repo.delete_post(id).await;
        self.refresh_after("delete", result.as_ref().err()).await;
        result
    }

    /// Forget the fetched list; reads fall back to defaults until the next fetch.
    pub fn reset(&self) {
        *rw_write(&self.state, SOURCE, "reset") = CacheState::Stale;
    }

    async fn refresh_after(&self, op: &'static str, error: Option<&RepoError>) {
        if let Some(err) = error {
            warn!(
                target = "cache::blog::refresh_after",
                op,
                error = %err,
                "blog write failed"
            );
        }
        self.fetch().await;
    }
}
