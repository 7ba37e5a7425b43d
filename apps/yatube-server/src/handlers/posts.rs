//! Feeds, post pages, comments and follows.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::domain::Id;
use yatube_core::error::DomainError;
use yatube_core::forms::{FormErrors, PostSubmission};
use yatube_core::pagination::requested_number;
use yatube_core::service::Actor;
use yatube_shared::{CommentForm, PageQuery};

use super::forms::read_post_submission;
use super::redirect;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{
    CreatePostTemplate, CommentView, Feed, FollowTemplate, GroupListTemplate, IndexTemplate, Nav,
    PostDetailTemplate, PostFormView, PostView, ProfileTemplate, html, render, render_body,
};

/// Prefix shared by every cached home feed page.
pub const INDEX_CACHE_PREFIX: &str = "index_page";

/// Cache key of one home feed page as seen by one viewer.
pub fn index_cache_key(viewer: Option<&str>, page: u64) -> String {
    match viewer {
        Some(username) => format!("{INDEX_CACHE_PREFIX}:user:{username}:{page}"),
        None => format!("{INDEX_CACHE_PREFIX}:anon:{page}"),
    }
}

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

fn detail_url(post_id: Id) -> String {
    format!("/posts/{post_id}/")
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let nav = Nav::from(&identity);
    let requested = requested_number(query.page.as_deref());
    let key = requested.map(|number| index_cache_key(nav.username.as_deref(), number));

    if let Some(key) = &key {
        if let Some(body) = state.cache.get(key).await {
            tracing::debug!(key = %key, "Home feed served from cache");
            return Ok(html(body));
        }
    }

    let page = state.posts.index(query.page.as_deref()).await?;
    let body = render_body(IndexTemplate {
        nav,
        feed: Feed::new(&page, state.media.as_ref()),
    })?;

    // Only a page that resolved to the number asked for is cached.
    match key {
        Some(key) if requested == Some(page.number) => {
            // A cache outage degrades to rendering on every request.
            if let Err(e) = state
                .cache
                .set(&key, &body, Some(state.index_cache_ttl))
                .await
            {
                tracing::warn!(key = %key, error = %e, "Failed to cache home feed");
            }
        }
        _ => tracing::debug!(page = page.number, "Out-of-range home feed page not cached"),
    }

    Ok(html(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (group, page) = state
        .posts
        .group_feed(&path, query.page.as_deref())
        .await?;

    render(GroupListTemplate {
        nav: (&identity).into(),
        group,
        feed: Feed::new(&page, state.media.as_ref()),
    })
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = identity.actor();
    let profile = state
        .posts
        .profile(&path, query.page.as_deref(), viewer.as_ref())
        .await?;

    let can_follow = viewer.is_some_and(|v| v.user_id != profile.author.id);
    render(ProfileTemplate {
        nav: (&identity).into(),
        author: profile.author.username.clone(),
        post_count: profile.post_count,
        following: profile.following,
        can_follow,
        feed: Feed::new(&profile.page, state.media.as_ref()),
    })
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(path.into_inner()).await?;

    let can_edit = identity
        .0
        .as_ref()
        .is_some_and(|i| i.user_id == detail.card.post.author_id);

    render(PostDetailTemplate {
        nav: (&identity).into(),
        post: PostView::new(&detail.card, state.media.as_ref()),
        author_post_count: detail.author_post_count,
        comments: detail.comments.iter().map(CommentView::from).collect(),
        can_edit,
    })
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let groups = state.posts.groups().await?;

    render(CreatePostTemplate {
        nav: (&identity).into(),
        post_id: None,
        form: PostFormView::new("", None, &groups),
    })
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let submission = read_post_submission(&req, payload.into_inner()).await?;
    let (text, group) = (submission.text.clone(), submission.group.clone());

    match state.posts.create(&identity.actor(), submission).await {
        Ok(_) => Ok(redirect(profile_url(&identity.username))),
        Err(DomainError::Invalid(errors)) => {
            rerender_form(&state, &identity, None, (&text, group.as_deref()), None, &errors).await
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = match state.posts.editable(&identity.actor(), post_id).await {
        Ok(post) => post,
        Err(DomainError::Forbidden) => return Ok(redirect(detail_url(post_id))),
        Err(e) => return Err(e.into()),
    };

    let groups = state.posts.groups().await?;
    let selected = post.group_id.map(|id| id.to_string());
    render(CreatePostTemplate {
        nav: (&identity).into(),
        post_id: Some(post.id),
        form: PostFormView::new(&post.text, selected.as_deref(), &groups)
            .with_image(post.image.as_deref().map(|p| state.media.url(p))),
    })
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
    req: HttpRequest,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let actor = identity.actor();

    // Non-authors bounce to the post before the body is even read.
    let current = match state.posts.editable(&actor, post_id).await {
        Ok(post) => post,
        Err(DomainError::Forbidden) => return Ok(redirect(detail_url(post_id))),
        Err(e) => return Err(e.into()),
    };

    let submission: PostSubmission = read_post_submission(&req, payload.into_inner()).await?;
    let (text, group) = (submission.text.clone(), submission.group.clone());

    match state.posts.edit(&actor, post_id, submission).await {
        Ok(post) => Ok(redirect(detail_url(post.id))),
        Err(DomainError::Forbidden) => Ok(redirect(detail_url(post_id))),
        Err(DomainError::Invalid(errors)) => {
            let image = current.image.as_deref().map(|p| state.media.url(p));
            rerender_form(
                &state,
                &identity,
                Some(post_id),
                (&text, group.as_deref()),
                image,
                &errors,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

async fn rerender_form(
    state: &AppState,
    identity: &Identity,
    post_id: Option<Id>,
    (text, group): (&str, Option<&str>),
    current_image: Option<String>,
    errors: &FormErrors,
) -> AppResult<HttpResponse> {
    tracing::debug!(errors = %errors, "Post form rejected");
    let groups = state.posts.groups().await?;

    render(CreatePostTemplate {
        nav: identity.into(),
        post_id,
        form: PostFormView::new(text, group, &groups)
            .with_image(current_image)
            .with_errors(errors),
    })
}

/// POST /posts/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    match state
        .posts
        .add_comment(&identity.actor(), post_id, &form.text)
        .await
    {
        // An empty comment is dropped silently.
        Ok(_) | Err(DomainError::Invalid(_)) => Ok(redirect(detail_url(post_id))),
        Err(e) => Err(e.into()),
    }
}

/// GET /follow/
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .follow_feed(&identity.actor(), query.page.as_deref())
        .await?;

    render(FollowTemplate {
        nav: (&identity).into(),
        feed: Feed::new(&page, state.media.as_ref()),
    })
}

/// GET /profile/{username}/follow/
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let actor: Actor = identity.actor();
    let outcome = state.follows.follow(&actor, &path).await?;
    tracing::debug!(author = %path, ?outcome, "Follow requested");

    Ok(redirect(profile_url(&path)))
}

/// GET /profile/{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.follows.unfollow(&identity.actor(), &path).await?;

    Ok(redirect(profile_url(&path)))
}
