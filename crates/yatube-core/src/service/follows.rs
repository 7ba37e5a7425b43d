//! Follow / unfollow.

use crate::domain::{Follow, User};
use crate::error::{DomainError, RepoError};

use super::{Actor, Repositories};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
    /// Following oneself is ignored.
    SelfFollow,
}

pub struct FollowService {
    repos: Repositories,
}

impl FollowService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Subscribe `actor` to `username`. Repeating the call is a no-op.
    pub async fn follow(&self, actor: &Actor, username: &str) -> Result<FollowOutcome, DomainError> {
        let author = self.author(username).await?;
        if author.id == actor.user_id {
            return Ok(FollowOutcome::SelfFollow);
        }

        if self.repos.follows.exists(actor.user_id, author.id).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        match self
            .repos
            .follows
            .save(Follow::new(actor.user_id, author.id))
            .await
        {
            Ok(_) => {
                tracing::info!(follower = %actor.username, author = %author.username, "Followed");
                Ok(FollowOutcome::Followed)
            }
            // A concurrent request created the same pair first.
            Err(RepoError::Constraint(_)) => Ok(FollowOutcome::AlreadyFollowing),
            Err(e) => Err(e.into()),
        }
    }

    /// Unsubscribe `actor` from `username`, returning whether a follow existed.
    pub async fn unfollow(&self, actor: &Actor, username: &str) -> Result<bool, DomainError> {
        let author = self.author(username).await?;
        let removed = self
            .repos
            .follows
            .delete_pair(actor.user_id, author.id)
            .await?;

        if removed {
            tracing::info!(follower = %actor.username, author = %author.username, "Unfollowed");
        }
        Ok(removed)
    }

    async fn author(&self, username: &str) -> Result<User, DomainError> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}
