//! In-process state shared by readers and admin writers.
//!
//! - [`ContentStore`]: the site content tree behind a lock.
//! - [`BlogCache`]: the blog post list kept in sync with the posts table.

mod blog;
mod content;
pub(crate) mod lock;

pub use blog::{BlogCache, CacheState};
pub use content::ContentStore;
