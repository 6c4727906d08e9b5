//! Blog read model. Every view reads the cache snapshot; only
//! [`BlogService::refresh`] touches the network.

use std::{num::NonZeroU32, sync::Arc};

use serde::Serialize;

use crate::application::pagination::{NumberedPage, PageRequest, paginate};
use crate::cache::{BlogCache, ContentStore};
use crate::domain::content::ContentConfig;
use crate::domain::entities::Post;
use crate::domain::images::{ImageArea, resolve_image};
use crate::domain::posts::{self, is_all};

const RELATED_LIMIT: usize = 3;
pub const POST_NOT_FOUND_HEADING: &str = "Post Not Found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    pub featured: bool,
    pub image_src: String,
}

impl PostCard {
    fn from_post(post: &Post, content: &ContentConfig) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            category: post.category.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
            featured: post.featured,
            image_src: resolve_image(content, ImageArea::Blog, &post.image),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogListing {
    pub category: Option<String>,
    pub categories: Vec<String>,
    pub featured: Option<PostCard>,
    pub page: NumberedPage<PostCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostDetail {
    Found {
        post: Box<Post>,
        image_src: String,
        related: Vec<PostCard>,
    },
    NotFound {
        id: String,
    },
}

impl PostDetail {
    /// Look `id` up in `posts`, resolving its image and related posts
    /// against `content`.
    pub fn resolve(served: &[Post], content: &ContentConfig, id: &str) -> Self {
        let Some(post) = posts::find_by_id(served, id) else {
            return PostDetail::NotFound { id: id.to_string() };
        };

        PostDetail::Found {
            image_src: resolve_image(content, ImageArea::Blog, &post.image),
            related: posts::related(served, post, RELATED_LIMIT)
                .into_iter()
                .map(|related| PostCard::from_post(related, content))
                .collect(),
            post: Box::new(post.clone()),
        }
    }

    pub fn heading(&self) -> &str {
        match self {
            PostDetail::Found { post, .. } => &post.title,
            PostDetail::NotFound { .. } => POST_NOT_FOUND_HEADING,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PostDetail::Found { .. })
    }
}

#[derive(Clone)]
pub struct BlogService {
    cache: Arc<BlogCache>,
    content: Arc<ContentStore>,
    page_size: NonZeroU32,
}

impl BlogService {
    pub fn new(cache: Arc<BlogCache>, content: Arc<ContentStore>, page_size: NonZeroU32) -> Self {
        Self {
            cache,
            content,
            page_size,
        }
    }

    pub fn cache(&self) -> &Arc<BlogCache> {
        &self.cache
    }

    /// Pull the latest posts; returns how many are now served.
    pub async fn refresh(&self) -> usize {
        self.cache.fetch().await.len()
    }

    pub fn get_post_by_id(&self, id: &str) -> Option<Post> {
        self.cache.get_post_by_id(id)
    }

    /// The featured post heads the unfiltered listing; the grid then holds the rest.
    pub fn listing(&self, category: Option<&str>, page: usize) -> BlogListing {
        let snapshot = self.cache.snapshot();
        let category = category.filter(|value| !is_all(value));

        self.content.read(|content| {
            let featured = match category {
                None => snapshot.iter().find(|post| post.featured),
                Some(_) => None,
            };
            let cards: Vec<PostCard> = posts::in_category(&snapshot, category)
                .into_iter()
                .filter(|post| featured.is_none_or(|lead| lead.id != post.id))
                .map(|post| PostCard::from_post(post, content))
                .collect();

            BlogListing {
                category: category.map(str::to_string),
                categories: posts::categories(&snapshot),
                featured: featured.map(|post| PostCard::from_post(post, content)),
                page: paginate(&cards, PageRequest::new(page, self.page_size)),
            }
        })
    }

    pub fn post_detail(&self, id: &str) -> PostDetail {
        let snapshot = self.cache.snapshot();
        self.content
            .read(|content| PostDetail::resolve(&snapshot, content, id))
    }

    pub fn categories(&self) -> Vec<String> {
        posts::categories(&self.cache.snapshot())
    }

    /// The first post flagged as featured.
    pub fn featured(&self) -> Option<Post> {
        self.cache
            .snapshot()
            .iter()
            .find(|post| post.featured)
            .cloned()
    }
}
