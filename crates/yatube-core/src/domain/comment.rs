use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED};

/// Comment entity - a reply left under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    pub post_id: Id,
    pub author_id: Id,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Id, author_id: Id, text: impl Into<String>) -> Self {
        Self {
            id: UNSAVED,
            post_id,
            author_id,
            text: text.into(),
            created: Utc::now(),
        }
    }
}
