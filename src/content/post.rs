//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The render-relevant view of a blog post
///
/// Built once per run by the loader and immutable afterwards. The card
/// fingerprint covers `slug`, `title`, and `excerpt`; `date` is carried for
/// listings and template helpers only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCard {
    /// Filename-derived identifier, unique per post
    pub slug: String,

    /// Post title
    pub title: String,

    /// Plain-text excerpt, length-bounded
    pub excerpt: String,

    /// Publication date
    pub date: Option<DateTime<Local>>,
}

impl PostCard {
    /// Create a post card with no date
    pub fn new(slug: impl Into<String>, title: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            excerpt: excerpt.into(),
            date: None,
        }
    }
}
