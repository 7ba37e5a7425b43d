//! Feeds, post detail and the post/comment write paths.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Comment, Group, Id, Post, PostFilter, User};
use crate::error::DomainError;
use crate::forms::{self, PostSubmission, Upload, ValidPost};
use crate::pagination::{PAGE_SIZE, Page, PageRequest};
use crate::ports::MediaStorage;

use super::{Actor, Repositories};

/// Directory under the media root that post images are stored in.
pub const POST_IMAGE_DIR: &str = "posts";

/// A post together with the records needed to display it.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

#[derive(Debug, Clone)]
pub struct CommentCard {
    pub comment: Comment,
    pub author: User,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub author: User,
    pub post_count: u64,
    /// Whether the viewer follows this author.
    pub following: bool,
    pub page: Page<PostCard>,
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub card: PostCard,
    pub author_post_count: u64,
    pub comments: Vec<CommentCard>,
}

pub struct PostService {
    repos: Repositories,
    media: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(repos: Repositories, media: Arc<dyn MediaStorage>) -> Self {
        Self { repos, media }
    }

    /// Home feed: every post.
    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostCard>, DomainError> {
        self.feed(PostFilter::All, page).await
    }

    /// Posts filed under the group with `slug`.
    pub async fn group_feed(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Group, Page<PostCard>), DomainError> {
        let group = self
            .repos
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("group", slug))?;

        let page = self.feed(PostFilter::Group(group.id), page).await?;
        Ok((group, page))
    }

    /// Posts written by `username`.
    pub async fn profile(
        &self,
        username: &str,
        page: Option<&str>,
        viewer: Option<&Actor>,
    ) -> Result<Profile, DomainError> {
        let author = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let following = match viewer {
            Some(viewer) if viewer.user_id != author.id => {
                self.repos.follows.exists(viewer.user_id, author.id).await?
            }
            _ => false,
        };

        let page = self.feed(PostFilter::Author(author.id), page).await?;
        Ok(Profile {
            post_count: page.total,
            author,
            following,
            page,
        })
    }

    /// Posts by every author the actor follows.
    pub async fn follow_feed(
        &self,
        actor: &Actor,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        self.feed(PostFilter::FollowedBy(actor.user_id), page).await
    }

    /// A single post with its comments in creation order.
    pub async fn detail(&self, post_id: Id) -> Result<PostDetail, DomainError> {
        let post = self.find_post(post_id).await?;
        let mut cards = self.hydrate(vec![post]).await?;
        let card = cards
            .pop()
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let author_post_count = self
            .repos
            .posts
            .count(PostFilter::Author(card.post.author_id))
            .await?;

        let comments = self.repos.comments.find_by_post(post_id).await?;
        let author_ids: Vec<Id> = comments.iter().map(|c| c.author_id).collect();
        let authors = self.users_by_id(&author_ids).await?;
        let comments = comments
            .into_iter()
            .filter_map(|comment| {
                let author = authors.get(&comment.author_id)?.clone();
                Some(CommentCard { comment, author })
            })
            .collect();

        Ok(PostDetail {
            card,
            author_post_count,
            comments,
        })
    }

    /// Groups offered by the post form.
    pub async fn groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.repos.groups.list().await?)
    }

    /// Validate and persist a new post authored by `actor`.
    pub async fn create(
        &self,
        actor: &Actor,
        submission: PostSubmission,
    ) -> Result<Post, DomainError> {
        let valid = self.validate(submission).await?;

        let post = Post::new(actor.user_id, valid.text, valid.group_id);
        let post = self.save_with_image(post, valid.image).await?;
        tracing::info!(post_id = post.id, author = %actor.username, "Post created");
        Ok(post)
    }

    /// The post `actor` may edit; anyone but the author is refused.
    pub async fn editable(&self, actor: &Actor, post_id: Id) -> Result<Post, DomainError> {
        let post = self.find_post(post_id).await?;
        if post.author_id != actor.user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    /// Validate and apply an edit. Identifier, author and creation time stay put.
    pub async fn edit(
        &self,
        actor: &Actor,
        post_id: Id,
        submission: PostSubmission,
    ) -> Result<Post, DomainError> {
        let mut post = self.editable(actor, post_id).await?;
        let valid = self.validate(submission).await?;

        post.text = valid.text;
        post.group_id = valid.group_id;
        let post = self.save_with_image(post, valid.image).await?;
        tracing::info!(post_id = post.id, "Post edited");
        Ok(post)
    }

    /// Attach a comment by `actor` to the post.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        post_id: Id,
        text: &str,
    ) -> Result<Comment, DomainError> {
        let post = self.find_post(post_id).await?;
        let text = forms::validate_comment(text).map_err(DomainError::Invalid)?;

        let comment = self
            .repos
            .comments
            .save(Comment::new(post.id, actor.user_id, text))
            .await?;
        tracing::debug!(post_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }

    /// Store the upload, if any, then the post. A post that fails to save
    /// takes its freshly stored image with it.
    async fn save_with_image(
        &self,
        mut post: Post,
        image: Option<Upload>,
    ) -> Result<Post, DomainError> {
        let stored = match image {
            Some(upload) => Some(
                self.media
                    .save(POST_IMAGE_DIR, &upload.filename, &upload.content)
                    .await?,
            ),
            None => None,
        };
        if let Some(path) = &stored {
            post.image = Some(path.clone());
        }

        match self.repos.posts.save(post).await {
            Ok(post) => Ok(post),
            Err(e) => {
                if let Some(path) = stored {
                    if let Err(cleanup) = self.media.delete(&path).await {
                        tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned image");
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn validate(&self, submission: PostSubmission) -> Result<ValidPost, DomainError> {
        let groups = self.repos.groups.list().await?;
        forms::validate_post(submission, &groups).map_err(DomainError::Invalid)
    }

    async fn find_post(&self, post_id: Id) -> Result<Post, DomainError> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn feed(
        &self,
        filter: PostFilter,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let total = self.repos.posts.count(filter).await?;
        let request = PageRequest::resolve(page, total, PAGE_SIZE);
        let posts = self
            .repos
            .posts
            .list(filter, request.offset(), request.limit())
            .await?;

        Ok(Page::new(self.hydrate(posts).await?, request, total))
    }

    /// Load the authors and groups of `posts` in two batched lookups.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, DomainError> {
        let author_ids: Vec<Id> = posts.iter().map(|p| p.author_id).collect();
        let group_ids: Vec<Id> = posts.iter().filter_map(|p| p.group_id).collect();

        let authors = self.users_by_id(&author_ids).await?;
        let groups: HashMap<Id, Group> = self
            .repos
            .groups
            .find_by_ids(&group_ids)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        Ok(posts
            .into_iter()
            .filter_map(|post| {
                let Some(author) = authors.get(&post.author_id).cloned() else {
                    tracing::warn!(post_id = post.id, "Post author missing, skipping");
                    return None;
                };
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Some(PostCard {
                    post,
                    author,
                    group,
                })
            })
            .collect())
    }

    async fn users_by_id(&self, ids: &[Id]) -> Result<HashMap<Id, User>, DomainError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        Ok(self
            .repos
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }
}
