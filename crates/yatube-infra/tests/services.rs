//! Application services exercised against the in-memory store.

use std::sync::Arc;

use yatube_core::DomainError;
use yatube_core::domain::{Group, Post, PostFilter, User};
use yatube_core::forms::{INVALID_CHOICE, INVALID_IMAGE, PostSubmission, REQUIRED, Upload};
use yatube_core::service::{
    AccountService, Actor, FollowOutcome, FollowService, LoginSubmission, PostService,
    Repositories, SignupSubmission,
};
use yatube_infra::{Argon2PasswordService, InMemoryStore, LocalMediaStorage};

const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0c, 0x0a, 0x00, 0x3b,
];

struct Fixture {
    media: tempfile::TempDir,
    repos: Repositories,
    posts: PostService,
    follows: FollowService,
    leo: User,
    ann: User,
    group: Group,
}

async fn fixture() -> Fixture {
    let media = tempfile::tempdir().unwrap();
    let repos = InMemoryStore::new().repositories();
    let storage = Arc::new(LocalMediaStorage::new(media.path(), "/media/").unwrap());

    let leo = repos.users.save(User::new("leo", "x")).await.unwrap();
    let ann = repos.users.save(User::new("ann", "x")).await.unwrap();
    let group = repos
        .groups
        .save(Group::new("Test group", "test-slug", "Test description"))
        .await
        .unwrap();

    Fixture {
        media,
        posts: PostService::new(repos.clone(), storage),
        follows: FollowService::new(repos.clone()),
        repos,
        leo,
        ann,
        group,
    }
}

fn submission(text: &str, group: Option<&Group>) -> PostSubmission {
    PostSubmission {
        text: text.to_string(),
        group: group.map(|g| g.id.to_string()),
        image: None,
    }
}

#[tokio::test]
async fn test_create_post_binds_author_and_group() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);

    let post = f
        .posts
        .create(&actor, submission("Hello", Some(&f.group)))
        .await
        .unwrap();

    assert_eq!(f.repos.posts.count(PostFilter::All).await.unwrap(), 1);
    assert_eq!(post.text, "Hello");
    assert_eq!(post.author_id, f.leo.id);
    assert_eq!(post.group_id, Some(f.group.id));
}

#[tokio::test]
async fn test_create_post_with_image_stores_file() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);
    let mut form = submission("With picture", None);
    form.image = Some(Upload {
        filename: "small.gif".to_string(),
        content: SMALL_GIF.to_vec(),
    });

    let post = f.posts.create(&actor, form).await.unwrap();

    assert_eq!(post.image.as_deref(), Some("posts/small.gif"));
    assert!(f.media.path().join("posts/small.gif").exists());
}

#[tokio::test]
async fn test_failed_save_removes_stored_image() {
    let f = fixture().await;
    let ghost = Actor {
        user_id: 999,
        username: "ghost".to_string(),
        is_staff: false,
    };
    let mut form = submission("Orphan", None);
    form.image = Some(Upload {
        filename: "small.gif".to_string(),
        content: SMALL_GIF.to_vec(),
    });

    let result = f.posts.create(&ghost, form).await;

    assert!(matches!(result, Err(DomainError::Repo(_))));
    assert_eq!(f.repos.posts.count(PostFilter::All).await.unwrap(), 0);
    assert!(!f.media.path().join("posts/small.gif").exists());
}

#[tokio::test]
async fn test_invalid_post_persists_nothing() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);
    let form = PostSubmission {
        text: "   ".to_string(),
        group: Some("999".to_string()),
        image: Some(Upload {
            filename: "notes.txt".to_string(),
            content: b"plain text".to_vec(),
        }),
    };

    let err = f.posts.create(&actor, form).await.unwrap_err();

    let DomainError::Invalid(errors) = err else {
        panic!("expected validation errors, got {err:?}");
    };
    assert_eq!(errors.field("text"), [REQUIRED]);
    assert_eq!(errors.field("group"), [INVALID_CHOICE]);
    assert_eq!(errors.field("image"), [INVALID_IMAGE]);
    assert_eq!(f.repos.posts.count(PostFilter::All).await.unwrap(), 0);
    assert!(!f.media.path().join("posts/notes.txt").exists());
}

#[tokio::test]
async fn test_edit_keeps_identity_and_date() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);
    let post = f
        .posts
        .create(&actor, submission("Before", Some(&f.group)))
        .await
        .unwrap();

    let edited = f
        .posts
        .edit(&actor, post.id, submission("After", None))
        .await
        .unwrap();

    assert_eq!(edited.id, post.id);
    assert_eq!(edited.pub_date, post.pub_date);
    assert_eq!(edited.text, "After");
    assert_eq!(edited.group_id, None);
}

#[tokio::test]
async fn test_edit_without_image_keeps_existing_one() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);
    let post = f
        .repos
        .posts
        .save(Post::new(f.leo.id, "pic", None).with_image("posts/old.gif"))
        .await
        .unwrap();

    let edited = f
        .posts
        .edit(&actor, post.id, submission("still pic", None))
        .await
        .unwrap();

    assert_eq!(edited.image.as_deref(), Some("posts/old.gif"));
}

#[tokio::test]
async fn test_non_author_cannot_edit() {
    let f = fixture().await;
    let post = f
        .posts
        .create(&Actor::from(&f.leo), submission("Mine", None))
        .await
        .unwrap();

    let err = f
        .posts
        .edit(&Actor::from(&f.ann), post.id, submission("Hijacked", None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Forbidden));
    let stored = f.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "Mine");
}

#[tokio::test]
async fn test_feeds_paginate_and_filter() {
    let f = fixture().await;
    let actor = Actor::from(&f.leo);
    for i in 0..13 {
        f.posts
            .create(&actor, submission(&format!("Post {i}"), Some(&f.group)))
            .await
            .unwrap();
    }
    f.posts
        .create(&Actor::from(&f.ann), submission("Ungrouped", None))
        .await
        .unwrap();

    let (group, first) = f.posts.group_feed("test-slug", None).await.unwrap();
    let (_, second) = f.posts.group_feed("test-slug", Some("2")).await.unwrap();

    assert_eq!(group.id, f.group.id);
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 3);
    assert!(
        first
            .items
            .iter()
            .chain(&second.items)
            .all(|card| card.group.as_ref().map(|g| g.id) == Some(f.group.id))
    );

    let index = f.posts.index(Some("abc")).await.unwrap();
    assert_eq!(index.number, 1);
    assert_eq!(index.items[0].post.text, "Ungrouped");
}

#[tokio::test]
async fn test_unknown_slug_and_username_are_not_found() {
    let f = fixture().await;

    assert!(matches!(
        f.posts.group_feed("nope", None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        f.posts.profile("nobody", None, None).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        f.posts.detail(404).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_follow_feed_tracks_subscriptions() {
    let f = fixture().await;
    let carl = f.repos.users.save(User::new("carl", "x")).await.unwrap();
    let ann = Actor::from(&f.ann);
    let carl = Actor::from(&carl);

    assert_eq!(
        f.follows.follow(&ann, "leo").await.unwrap(),
        FollowOutcome::Followed
    );
    f.posts
        .create(&Actor::from(&f.leo), submission("News", None))
        .await
        .unwrap();

    assert_eq!(f.posts.follow_feed(&ann, None).await.unwrap().total, 1);
    assert_eq!(f.posts.follow_feed(&carl, None).await.unwrap().total, 0);
}

#[tokio::test]
async fn test_follow_is_idempotent() {
    let f = fixture().await;
    let ann = Actor::from(&f.ann);

    f.follows.follow(&ann, "leo").await.unwrap();
    let again = f.follows.follow(&ann, "leo").await.unwrap();
    let own = f.follows.follow(&ann, "ann").await.unwrap();

    assert_eq!(again, FollowOutcome::AlreadyFollowing);
    assert_eq!(own, FollowOutcome::SelfFollow);
    assert_eq!(f.repos.follows.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_unfollow_removes_exactly_one() {
    let f = fixture().await;
    let ann = Actor::from(&f.ann);
    let leo = Actor::from(&f.leo);
    f.follows.follow(&ann, "leo").await.unwrap();
    f.follows.follow(&leo, "ann").await.unwrap();

    assert!(f.follows.unfollow(&ann, "leo").await.unwrap());
    assert!(!f.follows.unfollow(&ann, "leo").await.unwrap());
    assert_eq!(f.repos.follows.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_profile_reports_following() {
    let f = fixture().await;
    let ann = Actor::from(&f.ann);
    f.follows.follow(&ann, "leo").await.unwrap();

    let seen_by_ann = f.posts.profile("leo", None, Some(&ann)).await.unwrap();
    let anonymous = f.posts.profile("leo", None, None).await.unwrap();
    let own = f
        .posts
        .profile("leo", None, Some(&Actor::from(&f.leo)))
        .await
        .unwrap();

    assert!(seen_by_ann.following);
    assert!(!anonymous.following);
    assert!(!own.following);
}

#[tokio::test]
async fn test_comments_show_in_creation_order() {
    let f = fixture().await;
    let post = f
        .posts
        .create(&Actor::from(&f.leo), submission("Post", None))
        .await
        .unwrap();

    f.posts
        .add_comment(&Actor::from(&f.ann), post.id, "first")
        .await
        .unwrap();
    f.posts
        .add_comment(&Actor::from(&f.leo), post.id, "second")
        .await
        .unwrap();
    let blank = f.posts.add_comment(&Actor::from(&f.ann), post.id, "  ").await;

    assert!(matches!(blank, Err(DomainError::Invalid(_))));
    let detail = f.posts.detail(post.id).await.unwrap();
    let texts: Vec<&str> = detail
        .comments
        .iter()
        .map(|c| c.comment.text.as_str())
        .collect();
    assert_eq!(texts, ["first", "second"]);
    assert_eq!(detail.comments[0].author.username, "ann");
    assert_eq!(detail.author_post_count, 1);
}

#[tokio::test]
async fn test_signup_and_login() {
    let repos = InMemoryStore::new().repositories();
    let accounts = AccountService::new(repos.users.clone(), Arc::new(Argon2PasswordService::new()));

    let user = accounts
        .signup(SignupSubmission {
            username: "leo".to_string(),
            password1: "s3cret-pass".to_string(),
            password2: "s3cret-pass".to_string(),
        })
        .await
        .unwrap();
    assert_ne!(user.password_hash, "s3cret-pass");

    let duplicate = accounts
        .signup(SignupSubmission {
            username: "leo".to_string(),
            password1: "short".to_string(),
            password2: "other".to_string(),
        })
        .await;
    let Err(DomainError::Invalid(errors)) = duplicate else {
        panic!("duplicate signup must fail validation");
    };
    assert!(errors.has("username"));
    assert!(errors.has("password1"));
    assert!(errors.has("password2"));

    let logged_in = accounts
        .login(LoginSubmission {
            username: "leo".to_string(),
            password: "s3cret-pass".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    let wrong = accounts
        .login(LoginSubmission {
            username: "leo".to_string(),
            password: "nope".to_string(),
        })
        .await;
    assert!(matches!(wrong, Err(DomainError::Invalid(_))));
}
