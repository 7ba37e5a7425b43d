//! Post pages, the post form and comments over HTTP.

mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;

use common::{SMALL_GIF, TestApp, location, multipart};
use yatube_core::domain::PostFilter;
use yatube_server::build_app;

#[actix_web::test]
async fn test_post_detail_shows_post_and_author_count() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "A detailed post", Some(&t.group)).await;
    t.post(&t.leo, "Another one", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

    assert!(body.contains("A detailed post"));
    assert!(body.contains("Posts by this author: 2"));
    assert!(body.contains("/group/test-slug/"));
    assert!(!body.contains("/edit/"));
}

#[actix_web::test]
async fn test_create_requires_login() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get().uri("/create/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fcreate%2F");
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(t.session(&t.leo))
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("Test group"));

    let group = t.group.id.to_string();
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(t.session(&t.leo))
        .set_form([("text", "Fresh post"), ("group", group.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/leo/");

    let posts = t.repos.posts.list(PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].text, "Fresh post");
    assert_eq!(posts[0].author_id, t.leo.id);
    assert_eq!(posts[0].group_id, Some(t.group.id));
}

#[actix_web::test]
async fn test_create_with_blank_text_rerenders_form() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(t.session(&t.leo))
        .set_form([("text", "   "), ("group", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("This field is required."));
    assert_eq!(t.repos.posts.count(PostFilter::All).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_with_image_upload() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let (content_type, body) = multipart(
        &[("text", "With a picture")],
        Some(("image", "small.gif", SMALL_GIF)),
    );
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(t.session(&t.leo))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let posts = t.repos.posts.list(PostFilter::All, 0, 10).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].image.as_deref(), Some("posts/small.gif"));
    assert!(t.media.path().join("posts/small.gif").exists());

    // The stored file is served back with an image content type.
    let req = test::TestRequest::get()
        .uri("/media/posts/small.gif")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/gif"
    );

    // Feeds link the image.
    let req = test::TestRequest::get().uri("/profile/leo/").to_request();
    let page = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(page.contains("small.gif"));
}

#[actix_web::test]
async fn test_create_with_non_image_is_rejected() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let (content_type, body) = multipart(
        &[("text", "Not a picture")],
        Some(("image", "notes.gif", b"plain text, not a gif")),
    );
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(t.session(&t.leo))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(t.repos.posts.count(PostFilter::All).await.unwrap(), 0);
    assert!(!t.media.path().join("posts/notes.gif").exists());
}

#[actix_web::test]
async fn test_author_edits_post() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "First draft", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(t.session(&t.leo))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let group = t.group.id.to_string();
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(t.session(&t.leo))
        .set_form([("text", "Final text"), ("group", group.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let edited = t.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(edited.text, "Final text");
    assert_eq!(edited.group_id, Some(t.group.id));
    assert_eq!(edited.pub_date, post.pub_date);
    assert_eq!(t.repos.posts.count(PostFilter::All).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_non_author_is_redirected_from_edit() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "Leo's words", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;
    let detail = format!("/posts/{}/", post.id);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(t.session(&t.ann))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(t.session(&t.ann))
        .set_form([("text", "Hijacked")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let unchanged = t.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.text, "Leo's words");
}

#[actix_web::test]
async fn test_edit_missing_post_is_not_found() {
    let t = TestApp::new().await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/posts/404/edit/")
        .cookie(t.session(&t.leo))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_signed_in_user_comments() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "Discuss", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(t.session(&t.ann))
        .set_form([("text", "Nice post")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(t.repos.comments.count().await.unwrap(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(body.contains("Nice post"));
    assert!(body.contains("/profile/ann/"));
}

#[actix_web::test]
async fn test_anonymous_comment_redirects_to_login() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "Discuss", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .set_form([("text", "Drive-by")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/auth/login/?next=%2Fposts%2F{}%2Fcomment%2F", post.id)
    );
    assert_eq!(t.repos.comments.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_blank_comment_is_dropped() {
    let t = TestApp::new().await;
    let post = t.post(&t.leo, "Discuss", None).await;
    let app = test::init_service(build_app(t.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(t.session(&t.ann))
        .set_form([("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(t.repos.comments.count().await.unwrap(), 0);
}
