use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED};

/// Post entity - a single blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub text: String,
    /// Set once on creation, never updated.
    pub pub_date: DateTime<Utc>,
    pub author_id: Id,
    pub group_id: Option<Id>,
    /// Path relative to the media root, e.g. `posts/small.gif`.
    pub image: Option<String>,
}

impl Post {
    /// Create a new, unsaved post.
    pub fn new(author_id: Id, text: impl Into<String>, group_id: Option<Id>) -> Self {
        Self {
            id: UNSAVED,
            text: text.into(),
            pub_date: Utc::now(),
            author_id,
            group_id,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// First 15 characters of the text, used as a short title.
    pub fn excerpt(&self) -> String {
        self.text.chars().take(15).collect()
    }
}

/// Which posts a feed shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(Id),
    Author(Id),
    /// Posts by every author the given user follows.
    FollowedBy(Id),
}
