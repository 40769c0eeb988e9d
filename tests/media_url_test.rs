/// Integration tests for media URL lists on posts
mod common;
use serial_test::serial;

use common::database::*;
use greenhouse::blog::{self, NewPost, PostChanges};

fn post_with_media(image_urls: Vec<String>, video_urls: Vec<String>) -> NewPost {
    NewPost {
        title: "Media Post".to_string(),
        content: "Body".to_string(),
        excerpt: "Excerpt".to_string(),
        image_urls,
        video_urls,
        author_id: None,
        author_name: "grace".to_string(),
        is_published: true,
        is_ai_generated: false,
    }
}

#[actix_rt::test]
#[serial]
async fn image_urls_round_trip_in_order() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let urls = vec![
        "/uploads/aa11.png".to_string(),
        "/uploads/bb22.png".to_string(),
        "/uploads/cc33.png".to_string(),
    ];

    let created = blog::create(&db, post_with_media(urls.clone(), vec![]))
        .await
        .expect("Failed to create post");

    let read_back = blog::find(&db, created.id)
        .await
        .unwrap()
        .expect("Post missing");

    assert_eq!(read_back.image_url_list(), urls);
    // No videos were attached: the list reads back empty, stored as null
    assert_eq!(read_back.video_url_list(), Vec::<String>::new());
    assert!(read_back.video_urls.is_none());

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn updates_replace_url_lists_wholesale() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let created = blog::create(
        &db,
        post_with_media(vec!["/uploads/old.png".to_string()], vec![]),
    )
    .await
    .unwrap();

    let updated = blog::update(
        &db,
        created,
        PostChanges {
            image_urls: Some(vec![
                "/uploads/new1.png".to_string(),
                "/uploads/new2.png".to_string(),
            ]),
            video_urls: Some(vec!["https://res.cloudinary.com/demo/v1/clip.mp4".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(
        updated.image_url_list(),
        vec!["/uploads/new1.png".to_string(), "/uploads/new2.png".to_string()]
    );
    assert_eq!(
        updated.video_url_list(),
        vec!["https://res.cloudinary.com/demo/v1/clip.mp4".to_string()]
    );

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn every_mutation_refreshes_updated_at() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let created = blog::create(&db, post_with_media(vec![], vec![]))
        .await
        .unwrap();
    let first_touch = created.updated_at;

    std::thread::sleep(std::time::Duration::from_millis(20));

    // A metadata-only edit still counts as a mutation
    let updated = blog::update(
        &db,
        created,
        PostChanges {
            excerpt: Some("Fresher excerpt".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(updated.updated_at > first_touch);
    assert_eq!(updated.created_at, first_touch);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
