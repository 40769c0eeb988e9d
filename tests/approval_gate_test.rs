/// Integration tests for registration and the approval gate
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use greenhouse::orm::users::Role;
use greenhouse::permission::can_author;
use greenhouse::user::{self, AccountError};

#[actix_rt::test]
#[serial]
async fn registration_starts_unapproved() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let account = user::register(&db, "newcomer", "password123")
        .await
        .expect("Failed to register");

    assert_eq!(account.role, Role::User);
    assert!(!account.is_approved);

    // The stored hash verifies against the plaintext and nothing else
    assert!(greenhouse::session::verify_password("password123", &account.password));
    assert!(!greenhouse::session::verify_password("password124", &account.password));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn duplicate_usernames_are_rejected() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    user::register(&db, "taken", "password123")
        .await
        .expect("Failed to register");

    let result = user::register(&db, "taken", "otherpassword").await;
    assert!(matches!(result, Err(AccountError::UsernameTaken)));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn approval_unlocks_authoring() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    let pending = create_pending_test_user(&db, "alice", "password123")
        .await
        .expect("Failed to create test user");

    let profile = load_profile(&db, pending.id).await.unwrap();
    assert!(!can_author(Some(&profile)));

    let approved = user::approve(&db, pending.id).await.expect("Failed to approve");
    assert!(approved.is_approved);

    let profile = load_profile(&db, pending.id).await.unwrap();
    assert!(can_author(Some(&profile)));

    // Approving twice is harmless
    let again = user::approve(&db, pending.id).await.expect("Second approve failed");
    assert!(again.is_approved);

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn admin_role_overrides_the_approval_flag() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    // An admin whose approval bookkeeping was never set is still usable
    use chrono::Utc;
    use greenhouse::orm::users;
    use sea_orm::{entity::*, ActiveValue::Set};

    let now = Utc::now().naive_utc();
    let admin = users::ActiveModel {
        username: Set("root".to_string()),
        password: Set(greenhouse::session::hash_password("password123").unwrap()),
        role: Set(Role::Admin),
        is_approved: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("Failed to insert admin");

    let profile = load_profile(&db, admin.id).await.unwrap();
    assert!(can_author(Some(&profile)));

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}

#[actix_rt::test]
#[serial]
async fn seeded_bootstrap_admin_cannot_be_deleted() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to cleanup");

    user::seed_bootstrap_admin(&db)
        .await
        .expect("Failed to seed bootstrap admin");

    let admin = user::get_user_by_name(&db, "admin")
        .await
        .unwrap()
        .expect("Bootstrap admin missing");
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.is_approved);

    let result = user::delete(&db, admin.id).await;
    assert!(matches!(result, Err(AccountError::ProtectedAccount)));

    // Seeding again is a no-op
    user::seed_bootstrap_admin(&db)
        .await
        .expect("Second seed failed");

    cleanup_test_data(&db).await.expect("Failed to cleanup");
}
