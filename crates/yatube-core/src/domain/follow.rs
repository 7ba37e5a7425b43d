use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED};

/// Follow entity - `user` subscribes to the posts of `author`.
///
/// The pair `(author_id, user_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: Id,
    pub author_id: Id,
    pub user_id: Id,
}

impl Follow {
    pub fn new(user_id: Id, author_id: Id) -> Self {
        Self {
            id: UNSAVED,
            author_id,
            user_id,
        }
    }
}
