use serde::{Deserialize, Serialize};

use super::{Id, UNSAVED};

/// Group entity - a community posts can be filed under.
///
/// The slug is unique and is the identifier used in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: UNSAVED,
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }
}
