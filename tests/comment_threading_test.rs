/// Integration tests for the comment threading engine
/// Partition of top-level vs replies, sibling ordering, parent validation,
/// subtree collection and cascade deletion.
mod common;
use serial_test::serial;

use chrono::{Duration, Utc};
use common::{database::*, fixtures::*};
use greenhouse::comments::{self, CommentChanges, NewComment, ThreadError};

#[actix_rt::test]
#[serial]
async fn top_level_and_reply_listings_partition_cleanly() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Threaded Post", true)
        .await
        .unwrap();

    let a = create_test_comment(&db, post.id, None, "Ann", "top a", None).await.unwrap();
    let b = create_test_comment(&db, post.id, None, "Ben", "top b", None).await.unwrap();
    let a1 = create_test_comment(&db, post.id, Some(a.id), "Cal", "reply a1", None)
        .await
        .unwrap();
    let a2 = create_test_comment(&db, post.id, Some(a.id), "Dee", "reply a2", None)
        .await
        .unwrap();

    let top = comments::top_level_for_post(&db, post.id).await.unwrap();
    let top_ids: Vec<i32> = top.iter().map(|c| c.comment.id).collect();
    assert_eq!(top.len(), 2);
    assert!(top_ids.contains(&a.id) && top_ids.contains(&b.id));
    assert!(!top_ids.contains(&a1.id) && !top_ids.contains(&a2.id));

    let replies = comments::replies_for(&db, a.id).await.unwrap();
    let reply_ids: Vec<i32> = replies.iter().map(|c| c.comment.id).collect();
    assert_eq!(replies.len(), 2);
    assert!(reply_ids.contains(&a1.id) && reply_ids.contains(&a2.id));
    assert!(!reply_ids.contains(&b.id));

    // Reply counts come from the listing, not a stored counter
    let a_listed = top.iter().find(|c| c.comment.id == a.id).unwrap();
    let b_listed = top.iter().find(|c| c.comment.id == b.id).unwrap();
    assert_eq!(a_listed.reply_count, 2);
    assert_eq!(b_listed.reply_count, 0);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn siblings_list_newest_first() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Ordered Post", true)
        .await
        .unwrap();

    let base = Utc::now().naive_utc();
    let oldest = create_test_comment(&db, post.id, None, "Ann", "first", Some(base - Duration::minutes(10)))
        .await
        .unwrap();
    let middle = create_test_comment(&db, post.id, None, "Ben", "second", Some(base - Duration::minutes(5)))
        .await
        .unwrap();
    let newest = create_test_comment(&db, post.id, None, "Cal", "third", Some(base))
        .await
        .unwrap();

    let top = comments::top_level_for_post(&db, post.id).await.unwrap();
    let ids: Vec<i32> = top.iter().map(|c| c.comment.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn a_post_with_no_comments_lists_empty() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Quiet Post", true)
        .await
        .unwrap();

    let top = comments::top_level_for_post(&db, post.id).await.unwrap();
    assert!(top.is_empty());

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn creation_validates_post_and_parent() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Post A", true).await.unwrap();
    let other = create_test_post(&db, None, "grace", "Post B", true).await.unwrap();
    let parent = create_test_comment(&db, post.id, None, "Ann", "top", None)
        .await
        .unwrap();

    // Unknown post
    let result = comments::create(
        &db,
        999_999,
        NewComment {
            author_name: "Sam".to_string(),
            content: "hello".to_string(),
            parent_id: None,
        },
    )
    .await;
    assert!(matches!(result, Err(ThreadError::PostNotFound)));

    // Dangling parent
    let result = comments::create(
        &db,
        post.id,
        NewComment {
            author_name: "Sam".to_string(),
            content: "hello".to_string(),
            parent_id: Some(999_999),
        },
    )
    .await;
    assert!(matches!(result, Err(ThreadError::ParentNotFound)));

    // Parent on a different post
    let result = comments::create(
        &db,
        other.id,
        NewComment {
            author_name: "Sam".to_string(),
            content: "hello".to_string(),
            parent_id: Some(parent.id),
        },
    )
    .await;
    assert!(matches!(result, Err(ThreadError::ParentPostMismatch)));

    // Valid reply still goes through
    let reply = comments::create(
        &db,
        post.id,
        NewComment {
            author_name: "Sam".to_string(),
            content: "hello".to_string(),
            parent_id: Some(parent.id),
        },
    )
    .await
    .expect("Valid reply rejected");
    assert_eq!(reply.parent_id, Some(parent.id));
    assert_eq!(reply.post_id, post.id);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn newlines_in_content_survive_verbatim() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Multiline Post", true)
        .await
        .unwrap();

    let content = "line one\n\nline two\n\tindented";
    let created = comments::create(
        &db,
        post.id,
        NewComment {
            author_name: "Sam".to_string(),
            content: content.to_string(),
            parent_id: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.content, content);

    let top = comments::top_level_for_post(&db, post.id).await.unwrap();
    assert_eq!(top[0].comment.content, content);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn unapproved_comments_are_hidden_from_listings_and_counts() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Moderated Post", true)
        .await
        .unwrap();
    let top = create_test_comment(&db, post.id, None, "Ann", "visible", None)
        .await
        .unwrap();
    let reply = create_test_comment(&db, post.id, Some(top.id), "Ben", "spam", None)
        .await
        .unwrap();

    comments::moderate(
        &db,
        reply.id,
        CommentChanges {
            author_name: None,
            content: None,
            is_approved: Some(false),
        },
    )
    .await
    .expect("Failed to moderate");

    let listed = comments::top_level_for_post(&db, post.id).await.unwrap();
    assert_eq!(listed[0].reply_count, 0);
    assert!(comments::replies_for(&db, top.id).await.unwrap().is_empty());

    // The moderation tree still shows it
    let tree = comments::tree_for_post(&db, post.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].replies.len(), 1);
    assert!(!tree[0].replies[0].comment.is_approved);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn deleting_a_comment_removes_its_whole_subtree() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let post = create_test_post(&db, None, "grace", "Deep Post", true)
        .await
        .unwrap();

    // root -> child -> grandchild, plus an unrelated sibling
    let root = create_test_comment(&db, post.id, None, "Ann", "root", None).await.unwrap();
    let child = create_test_comment(&db, post.id, Some(root.id), "Ben", "child", None)
        .await
        .unwrap();
    let grandchild =
        create_test_comment(&db, post.id, Some(child.id), "Cal", "grandchild", None)
            .await
            .unwrap();
    let sibling = create_test_comment(&db, post.id, None, "Dee", "sibling", None)
        .await
        .unwrap();

    let subtree = comments::fetch_subtree(&db, root.id).await.unwrap();
    let subtree_ids: Vec<i32> = subtree.iter().map(|c| c.id).collect();
    assert_eq!(subtree.len(), 2);
    assert!(subtree_ids.contains(&child.id) && subtree_ids.contains(&grandchild.id));

    let removed = comments::delete_with_replies(&db, root.id).await.unwrap();
    assert_eq!(removed, 3);

    let remaining = comments::top_level_for_post(&db, post.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].comment.id, sibling.id);

    // No orphaned replies are left pointing at deleted parents
    assert!(matches!(
        comments::replies_for(&db, child.id).await,
        Err(ThreadError::CommentNotFound)
    ));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn replies_for_a_missing_comment_is_not_found() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let result = comments::replies_for(&db, 31337).await;
    assert!(matches!(result, Err(ThreadError::CommentNotFound)));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
