//! Askama templates and the view models they render.

use actix_web::HttpResponse;
use askama::Template;

use yatube_core::domain::{Group, Id};
use yatube_core::forms::{FormErrors, NON_FIELD};
use yatube_core::pagination::Page;
use yatube_core::ports::MediaStorage;
use yatube_core::service::{CommentCard, PostCard};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppError;

/// Render a template into a `200 OK` HTML response.
pub fn render<T: Template>(template: T) -> Result<HttpResponse, AppError> {
    Ok(html(render_body(template)?))
}

/// Render a template into its HTML body.
pub fn render_body<T: Template>(template: T) -> Result<String, AppError> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("Template rendering failed: {e}")))
}

pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Header state: who is signed in.
#[derive(Debug, Clone, Default)]
pub struct Nav {
    pub username: Option<String>,
    pub is_staff: bool,
}

impl Nav {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}

impl From<&Identity> for Nav {
    fn from(identity: &Identity) -> Self {
        Self {
            username: Some(identity.username.clone()),
            is_staff: identity.is_staff,
        }
    }
}

impl From<&OptionalIdentity> for Nav {
    fn from(identity: &OptionalIdentity) -> Self {
        identity.0.as_ref().map(Nav::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct GroupLink {
    pub title: String,
    pub slug: String,
}

/// A post as shown in feeds and on its detail page.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: Id,
    pub text: String,
    pub excerpt: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub image_url: Option<String>,
}

impl PostView {
    pub fn new(card: &PostCard, media: &dyn MediaStorage) -> Self {
        Self {
            id: card.post.id,
            text: card.post.text.clone(),
            excerpt: card.post.excerpt(),
            pub_date: card.post.pub_date.format("%d %B %Y").to_string(),
            author: card.author.username.clone(),
            group: card.group.as_ref().map(|g| GroupLink {
                title: g.title.clone(),
                slug: g.slug.clone(),
            }),
            image_url: card.post.image.as_deref().map(|path| media.url(path)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author: String,
    pub text: String,
    pub created: String,
}

impl From<&CommentCard> for CommentView {
    fn from(card: &CommentCard) -> Self {
        Self {
            author: card.author.username.clone(),
            text: card.comment.text.clone(),
            created: card.comment.created.format("%d %B %Y %H:%M").to_string(),
        }
    }
}

/// A paginated list of posts plus paginator state.
#[derive(Debug, Clone)]
pub struct Feed {
    pub posts: Vec<PostView>,
    pub number: u64,
    pub num_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: u64,
    pub next_page_number: u64,
}

impl Feed {
    pub fn new(page: &Page<PostCard>, media: &dyn MediaStorage) -> Self {
        Self {
            posts: page
                .items
                .iter()
                .map(|card| PostView::new(card, media))
                .collect(),
            number: page.number,
            num_pages: page.num_pages,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            previous_page_number: page.previous_page_number(),
            next_page_number: page.next_page_number(),
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }
}

#[derive(Debug, Clone)]
pub struct GroupOption {
    pub id: Id,
    pub title: String,
    pub selected: bool,
}

/// Values and errors of the post form, for rendering.
#[derive(Debug, Clone, Default)]
pub struct PostFormView {
    pub text: String,
    pub groups: Vec<GroupOption>,
    pub current_image: Option<String>,
    pub text_errors: Vec<String>,
    pub group_errors: Vec<String>,
    pub image_errors: Vec<String>,
}

impl PostFormView {
    pub fn new(text: &str, selected: Option<&str>, groups: &[Group]) -> Self {
        let selected = selected.map(str::trim).unwrap_or_default();
        Self {
            text: text.to_string(),
            groups: groups
                .iter()
                .map(|g| GroupOption {
                    id: g.id,
                    title: g.title.clone(),
                    selected: g.id.to_string() == selected,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, url: Option<String>) -> Self {
        self.current_image = url;
        self
    }

    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.text_errors = errors.field("text").to_vec();
        self.group_errors = errors.field("group").to_vec();
        self.image_errors = errors.field("image").to_vec();
        self
    }

    pub fn has_errors(&self) -> bool {
        !(self.text_errors.is_empty() && self.group_errors.is_empty() && self.image_errors.is_empty())
    }
}

#[derive(Template)]
#[template(path = "posts/index.html")]
pub struct IndexTemplate {
    pub nav: Nav,
    pub feed: Feed,
}

#[derive(Template)]
#[template(path = "posts/group_list.html")]
pub struct GroupListTemplate {
    pub nav: Nav,
    pub group: Group,
    pub feed: Feed,
}

#[derive(Template)]
#[template(path = "posts/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub author: String,
    pub post_count: u64,
    pub following: bool,
    /// Signed in and looking at someone else's profile.
    pub can_follow: bool,
    pub feed: Feed,
}

#[derive(Template)]
#[template(path = "posts/post_detail.html")]
pub struct PostDetailTemplate {
    pub nav: Nav,
    pub post: PostView,
    pub author_post_count: u64,
    pub comments: Vec<CommentView>,
    pub can_edit: bool,
}

#[derive(Template)]
#[template(path = "posts/create_post.html")]
pub struct CreatePostTemplate {
    pub nav: Nav,
    /// `Some` when editing an existing post.
    pub post_id: Option<Id>,
    pub form: PostFormView,
}

#[derive(Template)]
#[template(path = "posts/follow.html")]
pub struct FollowTemplate {
    pub nav: Nav,
    pub feed: Feed,
}

#[derive(Template)]
#[template(path = "about/author.html")]
pub struct AboutAuthorTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "about/tech.html")]
pub struct AboutTechTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub username: String,
    pub next: String,
    pub errors: Vec<String>,
    pub username_errors: Vec<String>,
    pub password_errors: Vec<String>,
}

impl LoginTemplate {
    pub fn new(nav: Nav, username: &str, next: Option<&str>) -> Self {
        Self {
            nav,
            username: username.to_string(),
            next: next.unwrap_or_default().to_string(),
            errors: Vec::new(),
            username_errors: Vec::new(),
            password_errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.errors = errors.field(NON_FIELD).to_vec();
        self.username_errors = errors.field("username").to_vec();
        self.password_errors = errors.field("password").to_vec();
        self
    }
}

#[derive(Template)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub nav: Nav,
    pub username: String,
    pub username_errors: Vec<String>,
    pub password1_errors: Vec<String>,
    pub password2_errors: Vec<String>,
}

impl SignupTemplate {
    pub fn new(nav: Nav, username: &str) -> Self {
        Self {
            nav,
            username: username.to_string(),
            username_errors: Vec::new(),
            password1_errors: Vec::new(),
            password2_errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: &FormErrors) -> Self {
        self.username_errors = errors.field("username").to_vec();
        self.password1_errors = errors.field("password1").to_vec();
        self.password2_errors = errors.field("password2").to_vec();
        self
    }
}

#[derive(Template)]
#[template(path = "users/logged_out.html")]
pub struct LoggedOutTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/404.html")]
pub struct NotFoundTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/403.html")]
pub struct ForbiddenTemplate {
    pub nav: Nav,
}

#[derive(Template)]
#[template(path = "core/500.html")]
pub struct ServerErrorTemplate {
    pub nav: Nav,
}
