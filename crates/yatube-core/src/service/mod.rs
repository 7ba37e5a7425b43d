//! Application services - the business rules behind every route.
//!
//! Write operations take an explicit [`Actor`]: the authenticated principal
//! making the request.

mod accounts;
mod follows;
mod posts;

use std::sync::Arc;

pub use accounts::{AccountService, LoginSubmission, SignupSubmission};
pub use follows::{FollowOutcome, FollowService};
pub use posts::{CommentCard, PostCard, PostDetail, PostService, Profile};

use crate::domain::{Id, User};
use crate::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

/// The authenticated principal on whose behalf a write is performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Id,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Every repository the services need, behind their ports.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}
