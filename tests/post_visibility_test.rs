/// Integration tests for post visibility
/// A draft post must never surface in the published-only listing, and the
/// publish flag can be flipped freely in both directions.
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use greenhouse::blog::{self, PostChanges, PostFilters};
use greenhouse::comments::{self, NewComment};

#[actix_rt::test]
#[serial]
async fn public_listing_shows_published_posts_only() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let author = create_test_user(&db, "grace", "password123")
        .await
        .expect("Failed to create test user");

    let published = create_test_post(&db, Some(author.id), "grace", "Published Post", true)
        .await
        .expect("Failed to create post");
    let draft = create_test_post(&db, Some(author.id), "grace", "Draft Post", false)
        .await
        .expect("Failed to create post");

    let public = blog::list(
        &db,
        &PostFilters {
            published: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to list posts");

    assert!(public.iter().any(|p| p.id == published.id));
    assert!(!public.iter().any(|p| p.id == draft.id));

    // The unfiltered listing used by the dashboard sees both
    let all = blog::list(&db, &PostFilters::default())
        .await
        .expect("Failed to list posts");
    assert!(all.iter().any(|p| p.id == published.id));
    assert!(all.iter().any(|p| p.id == draft.id));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn publish_flag_can_flip_both_ways() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Toggle Post", false)
        .await
        .expect("Failed to create post");

    let post = blog::update(
        &db,
        post,
        PostChanges {
            is_published: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to publish");
    assert!(post.is_published);

    // Back to draft, no review workflow gates the transition
    let post = blog::update(
        &db,
        post,
        PostChanges {
            is_published: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to unpublish");
    assert!(!post.is_published);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn listing_filters_by_search_and_author() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    create_test_post(&db, None, "grace", "Launching a Startup", true)
        .await
        .expect("Failed to create post");
    create_test_post(&db, None, "henry", "Market Research Basics", true)
        .await
        .expect("Failed to create post");

    let hits = blog::list(
        &db,
        &PostFilters {
            search: Some("Startup".to_string()),
            published: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Launching a Startup");

    let by_author = blog::list(
        &db,
        &PostFilters {
            author: Some("henry".to_string()),
            published: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to filter by author");
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].author_name, "henry");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

/// The end-to-end scenario: draft post, publish it, comment, reply.
#[actix_rt::test]
#[serial]
async fn draft_to_published_to_threaded_comments() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let grace = create_test_user(&db, "grace", "password123")
        .await
        .expect("Failed to create test user");

    let post = blog::create(
        &db,
        blog::NewPost {
            title: "Launching a Startup".to_string(),
            content: "From idea to incorporation.".to_string(),
            excerpt: "From idea to incorporation.".to_string(),
            image_urls: vec![],
            video_urls: vec![],
            author_id: Some(grace.id),
            author_name: "grace".to_string(),
            is_published: false,
            is_ai_generated: false,
        },
    )
    .await
    .expect("Failed to create post");

    // Draft: visible to the dashboard, invisible publicly
    let admin_view = blog::list(&db, &PostFilters::default()).await.unwrap();
    assert!(admin_view.iter().any(|p| p.id == post.id));

    let public_view = blog::list(
        &db,
        &PostFilters {
            published: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!public_view.iter().any(|p| p.id == post.id));

    // Publish
    let post = blog::update(
        &db,
        post,
        PostChanges {
            is_published: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let public_view = blog::list(
        &db,
        &PostFilters {
            published: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(public_view.iter().any(|p| p.id == post.id));

    // Top-level comment and a reply to it
    let sams = comments::create(
        &db,
        post.id,
        NewComment {
            author_name: "Sam".to_string(),
            content: "Great read!".to_string(),
            parent_id: None,
        },
    )
    .await
    .expect("Failed to create comment");

    let lees = comments::create(
        &db,
        post.id,
        NewComment {
            author_name: "Lee".to_string(),
            content: "Agreed".to_string(),
            parent_id: Some(sams.id),
        },
    )
    .await
    .expect("Failed to create reply");

    let top = comments::top_level_for_post(&db, post.id).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].comment.id, sams.id);
    assert_eq!(top[0].reply_count, 1);

    let replies = comments::replies_for(&db, sams.id).await.unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].comment.id, lees.id);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
