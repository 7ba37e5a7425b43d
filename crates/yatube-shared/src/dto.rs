//! Data Transfer Objects - form fields and query parameters.
//!
//! Every field defaults to empty so a missing field surfaces as a form
//! validation error instead of a deserialization failure.

use serde::{Deserialize, Serialize};

/// `?page=N` on every paginated listing. Kept raw; the paginator decides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=/path/` carried through the login redirect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Create/edit post form, urlencoded variant (no file part).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

impl NextQuery {
    /// The redirect target if it is a local path, `/` otherwise.
    /// Scheme-relative targets (`//host`, `/\host`) and anything carrying
    /// control characters fall back to `/`.
    pub fn local_or_root(next: Option<&str>) -> String {
        match next {
            Some(path) if is_local_path(path) => path.to_string(),
            _ => "/".to_string(),
        }
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
}
