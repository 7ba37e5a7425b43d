//! Shared fixtures for the HTTP tests: an app over the in-memory adapters.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;

use yatube_core::domain::{Group, Post, User};
use yatube_core::ports::PasswordService;
use yatube_core::service::Repositories;
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService,
    LocalMediaStorage,
};
use yatube_server::middleware::auth::SESSION_COOKIE;
use yatube_server::state::{AppState, MEDIA_URL};

pub const PASSWORD: &str = "correct-horse-battery";

/// A 2x1 transparent GIF.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0c, 0x0a, 0x00, 0x3b,
];

pub struct TestApp {
    pub state: AppState,
    pub repos: Repositories,
    pub media: tempfile::TempDir,
    pub leo: User,
    pub ann: User,
    pub admin: User,
    pub group: Group,
}

impl TestApp {
    pub async fn new() -> Self {
        let media = tempfile::tempdir().unwrap();
        let repos = InMemoryStore::new().repositories();
        let passwords = Arc::new(Argon2PasswordService::new());
        let hash = passwords.hash(PASSWORD).unwrap();

        let leo = repos.users.save(User::new("leo", &hash)).await.unwrap();
        let ann = repos.users.save(User::new("ann", &hash)).await.unwrap();
        let admin = repos
            .users
            .save(User::new("admin", &hash).staff())
            .await
            .unwrap();
        let group = repos
            .groups
            .save(Group::new("Test group", "test-slug", "Test description"))
            .await
            .unwrap();

        let state = AppState::from_parts(
            repos.clone(),
            Arc::new(InMemoryCache::new()),
            Arc::new(LocalMediaStorage::new(media.path(), MEDIA_URL).unwrap()),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            passwords,
            Duration::from_secs(20),
        );

        Self {
            state,
            repos,
            media,
            leo,
            ann,
            admin,
            group,
        }
    }

    /// Session cookie signed in as `user`.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username, user.is_staff)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.repos
            .posts
            .save(Post::new(author.id, text, group.map(|g| g.id)))
            .await
            .unwrap()
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Number of posts rendered on a feed page.
pub fn article_count(body: &str) -> usize {
    body.matches("<article>").count()
}

/// A `multipart/form-data` body and its content type.
pub fn multipart(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "yatube-test-boundary";
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((name, filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
