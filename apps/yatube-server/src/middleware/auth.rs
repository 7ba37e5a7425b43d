//! Session extractors.
//!
//! The session is a JWT stored in an HTTP-only cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use std::future::{Ready, ready};

use yatube_core::domain::Id;
use yatube_core::ports::{AuthError, TokenClaims};
use yatube_core::service::Actor;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "yatube_session";

/// Where anonymous visitors are sent to sign in.
pub const LOGIN_URL: &str = "/auth/login/";

/// Authenticated user identity extractor.
///
/// Anonymous requests are redirected to the login page with `next` pointing
/// back at the original path.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Id,
    pub username: String,
    pub is_staff: bool,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            username: self.username.clone(),
            is_staff: self.is_staff,
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            is_staff: claims.is_staff,
        }
    }
}

/// Session cookie carrying `token`.
pub fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish()
}

/// Rejection for protected routes: a redirect to the login page.
#[derive(Debug)]
pub struct LoginRequired {
    pub next: String,
    pub reason: AuthError,
}

impl LoginRequired {
    pub fn location(&self) -> String {
        format!("{LOGIN_URL}?next={}", urlencoding::encode(&self.next))
    }
}

impl std::fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required for {}: {}", self.next, self.reason)
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::Found();
        response.insert_header((header::LOCATION, self.location()));
        // A stale or forged cookie is dropped so the browser stops sending it.
        if !matches!(self.reason, AuthError::MissingAuth) {
            response.cookie(expired_session_cookie());
        }
        response.finish()
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let cookie = req.cookie(SESSION_COOKIE).ok_or(AuthError::MissingAuth)?;
    if cookie.value().is_empty() {
        return Err(AuthError::MissingAuth);
    }

    state
        .tokens
        .validate_token(cookie.value())
        .map(Identity::from)
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(|reason| {
            tracing::debug!(path = %req.path(), reason = %reason, "Login required");
            LoginRequired {
                next: req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| req.path().to_string()),
                reason,
            }
        }))
    }
}

/// Optional identity extractor - anonymous visitors yield `None`.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(Identity::actor)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
