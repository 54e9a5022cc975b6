use domain::Role;
use signage_storage::{InMemoryUserStore, UserRecord, UserStore, UserUpdate};

fn user(user_id: &str, email: &str, role: Role) -> UserRecord {
    UserRecord {
        user_id: user_id.to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role,
        site_id: None,
    }
}

#[tokio::test]
async fn create_and_find_by_email() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("user-1", "admin@acme.fr", Role::Admin))
        .await
        .expect("create");

    let found = store.find_by_email("admin@acme.fr").await.expect("find");
    assert_eq!(found.expect("exists").user_id, "user-1");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("user-1", "admin@acme.fr", Role::Admin))
        .await
        .expect("create");
    let err = store
        .create_user(user("user-2", "admin@acme.fr", Role::Admin))
        .await
        .expect_err("duplicate");
    assert!(err.is_conflict());
}

#[tokio::test]
async fn has_superadmin_reflects_roles() {
    let store = InMemoryUserStore::new();
    assert!(!store.has_superadmin().await.expect("query"));

    store
        .create_user(user("user-1", "admin@acme.fr", Role::Admin))
        .await
        .expect("create");
    assert!(!store.has_superadmin().await.expect("query"));

    store
        .create_user(user("user-2", "root@acme.fr", Role::SuperAdmin))
        .await
        .expect("create");
    assert!(store.has_superadmin().await.expect("query"));
}

#[tokio::test]
async fn update_rehashes_password_only_when_given() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("user-1", "admin@acme.fr", Role::Admin))
        .await
        .expect("create");

    let updated = store
        .update_user(
            "user-1",
            UserUpdate {
                role: Some(Role::SuperAdmin),
                ..UserUpdate::default()
            },
        )
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.role, Role::SuperAdmin);
    assert_eq!(updated.password_hash, "$argon2id$stub");

    assert!(
        store
            .update_password_hash("user-1", "$argon2id$new")
            .await
            .expect("update hash")
    );
    let reloaded = store.find_user("user-1").await.expect("find").expect("exists");
    assert_eq!(reloaded.password_hash, "$argon2id$new");
}
