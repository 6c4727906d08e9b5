//! Domain entities carried by the content tree, the posts table and the audit log.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// An image field: an index into the content area's image table or a direct
/// URL/data URI. Anything else is kept verbatim and resolves to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Index(usize),
    Source(String),
    Other(serde_json::Value),
}

impl Default for ImageRef {
    fn default() -> Self {
        ImageRef::Source(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub social: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// A blog post as stored in the remote posts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: ImageRef,
    #[serde(default)]
    pub author: String,
    /// Display publish date as entered by the editor.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub detail: Option<String>,
    pub created_at: OffsetDateTime,
}
