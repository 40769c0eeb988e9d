/// Integration tests for post ownership and deletion rights
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use greenhouse::blog::{self, PostFilters};
use greenhouse::permission::can_modify_post;
use greenhouse::user::{self, AccountError};

#[actix_rt::test]
#[serial]
async fn author_name_match_grants_deletion_for_legacy_rows() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let alice = create_test_user(&db, "alice", "password123").await.unwrap();
    let bob = create_test_user(&db, "bob", "password123").await.unwrap();

    // Legacy row: no author foreign key, name-only attribution
    let post = create_test_post(&db, None, "alice", "Legacy Post", true)
        .await
        .unwrap();

    let alice_profile = load_profile(&db, alice.id).await.unwrap();
    let bob_profile = load_profile(&db, bob.id).await.unwrap();

    assert!(can_modify_post(Some(&alice_profile), &post));
    assert!(!can_modify_post(Some(&bob_profile), &post));
    assert!(!can_modify_post(None, &post));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn foreign_key_wins_over_display_name() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let alice = create_test_user(&db, "alice", "password123").await.unwrap();
    let bob = create_test_user(&db, "bob", "password123").await.unwrap();

    // Attributed to alice by id even though the display name says "bob"
    let post = create_test_post(&db, Some(alice.id), "bob", "Re-attributed", true)
        .await
        .unwrap();

    let alice_profile = load_profile(&db, alice.id).await.unwrap();
    let bob_profile = load_profile(&db, bob.id).await.unwrap();

    assert!(can_modify_post(Some(&alice_profile), &post));
    assert!(!can_modify_post(Some(&bob_profile), &post));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn admins_may_delete_any_post() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let admin = create_admin_test_user(&db, "moderator", "password123")
        .await
        .unwrap();
    let post = create_test_post(&db, None, "someone", "Anyone's Post", true)
        .await
        .unwrap();

    let admin_profile = load_profile(&db, admin.id).await.unwrap();
    assert!(can_modify_post(Some(&admin_profile), &post));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn deleting_a_post_removes_its_comments() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "alice", "Doomed Post", true)
        .await
        .unwrap();
    let top = create_test_comment(&db, post.id, None, "Sam", "First!", None)
        .await
        .unwrap();
    create_test_comment(&db, post.id, Some(top.id), "Lee", "Reply", None)
        .await
        .unwrap();

    blog::delete(&db, post.clone()).await.expect("Failed to delete post");

    assert!(blog::find(&db, post.id).await.unwrap().is_none());
    let remaining = greenhouse::comments::tree_for_post(&db, post.id).await.unwrap();
    assert!(remaining.is_empty());

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn deleting_a_user_detaches_but_keeps_their_content() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let alice = create_test_user(&db, "alice", "password123").await.unwrap();
    let post = create_test_post(&db, Some(alice.id), "alice", "Kept Post", true)
        .await
        .unwrap();
    let profile = create_test_staff(&db, Some(alice.id), "Alice").await.unwrap();

    user::delete(&db, alice.id).await.expect("Failed to delete user");

    let post = blog::find(&db, post.id).await.unwrap().expect("Post vanished");
    assert_eq!(post.author_id, None);
    assert_eq!(post.author_name, "alice");

    let profile = greenhouse::staff::find(&db, profile.id)
        .await
        .unwrap()
        .expect("Staff profile vanished");
    assert_eq!(profile.user_id, None);
    assert!(profile.is_active);

    // Name matching keeps working for the detached row, so a future account
    // with the same username would inherit deletion rights. Documented
    // migration-shim behavior.
    let posts = blog::list(&db, &PostFilters::default()).await.unwrap();
    assert_eq!(posts.len(), 1);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn deleting_a_missing_user_is_not_found() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let result = user::delete(&db, 4242).await;
    assert!(matches!(result, Err(AccountError::NotFound)));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
