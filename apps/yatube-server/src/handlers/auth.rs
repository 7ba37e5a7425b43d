//! Signup, login and logout.

use actix_web::{HttpResponse, http::header, web};

use yatube_core::domain::User;
use yatube_core::error::DomainError;
use yatube_core::service::{LoginSubmission, SignupSubmission};
use yatube_shared::{LoginForm, NextQuery, SignupForm};

use crate::middleware::auth::{OptionalIdentity, expired_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{LoggedOutTemplate, LoginTemplate, Nav, SignupTemplate, render};

/// Issue a session for `user` and redirect to `location`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.is_staff)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = user.id, username = %user.username, "Session started");
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    render(SignupTemplate::new((&identity).into(), ""))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let username = form.username.clone();

    let submission = SignupSubmission {
        username: form.username,
        password1: form.password1,
        password2: form.password2,
    };

    match state.accounts.signup(submission).await {
        Ok(user) => start_session(&state, &user, "/"),
        Err(DomainError::Invalid(errors)) => {
            render(SignupTemplate::new(Nav::anonymous(), &username).with_errors(&errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/login/
pub async fn login_form(
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    render(LoginTemplate::new(
        (&identity).into(),
        "",
        query.next.as_deref(),
    ))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let next = form.next.clone();
    let username = form.username.clone();

    let submission = LoginSubmission {
        username: form.username,
        password: form.password,
    };

    match state.accounts.login(submission).await {
        Ok(user) => {
            let location = NextQuery::local_or_root(next.as_deref());
            start_session(&state, &user, &location)
        }
        Err(DomainError::Invalid(errors)) => {
            tracing::info!(username = %username, "Failed login attempt");
            render(
                LoginTemplate::new(Nav::anonymous(), &username, next.as_deref())
                    .with_errors(&errors),
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/logout/
pub async fn logout() -> AppResult<HttpResponse> {
    let mut response = render(LoggedOutTemplate {
        nav: Nav::anonymous(),
    })?;
    response
        .add_cookie(&expired_session_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}
