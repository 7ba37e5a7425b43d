//! Signup, login and logout over HTTP.

mod common;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;

use common::{PASSWORD, TestApp, location};
use yatube_server::build_app;
use yatube_server::middleware::auth::SESSION_COOKIE;

fn session_value<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

#[actix_web::test]
async fn test_signup_creates_user_and_signs_in() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "newcomer"),
            ("password1", "s3cret-enough"),
            ("password2", "s3cret-enough"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(session_value(&resp).is_some_and(|v| !v.is_empty()));

    let user = t.repos.users.find_by_username("newcomer").await.unwrap();
    assert!(user.is_some_and(|u| u.password_hash != "s3cret-enough"));
}

#[actix_web::test]
async fn test_signup_rejects_taken_username() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "leo"),
            ("password1", "s3cret-enough"),
            ("password2", "s3cret-enough"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("A user with that username already exists."));
}

#[actix_web::test]
async fn test_login_redirects_to_next() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "leo"), ("password", PASSWORD), ("next", "/follow/")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/follow/");

    let token = session_value(&resp).unwrap();
    let claims = t.state.tokens.validate_token(&token).unwrap();
    assert_eq!(claims.user_id, t.leo.id);
    assert_eq!(claims.username, "leo");
}

#[actix_web::test]
async fn test_login_ignores_offsite_next() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    for next in ["//evil.example/", "/\\evil.example", "https://evil.example/"] {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form([("username", "leo"), ("password", PASSWORD), ("next", next)])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "{next}");
        assert_eq!(location(&resp), "/", "{next}");
    }
}

#[actix_web::test]
async fn test_login_with_wrong_password_rerenders() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "leo"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_value(&resp).is_none());
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Please enter a correct username and password."));
}

#[actix_web::test]
async fn test_login_form_carries_next() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=%2Fcreate%2F")
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("name=\"next\""));
    assert!(body.contains("create"));
}

#[actix_web::test]
async fn test_logout_expires_session() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/logout/")
        .cookie(t.session(&t.leo))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(session_value(&resp).as_deref(), Some(""));
}

#[actix_web::test]
async fn test_forged_session_is_dropped() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(session_value(&resp).as_deref(), Some(""));
}
