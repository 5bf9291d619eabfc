//! Integration tests for the credential store and authenticator.

use contec::config::Config;
use contec::services::{AuthError, AuthResult, CreateUser};
use contec::state::SharedState;
use sea_orm::{EntityTrait, Set};

async fn spawn_state() -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("contec-auth-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    SharedState::new(config)
        .await
        .expect("failed to create shared state")
}

fn create(username: &str, password: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password: password.to_string(),
        ..CreateUser::default()
    }
}

#[tokio::test]
async fn bootstrap_admin_exists_with_default_password() {
    let state = spawn_state().await;

    let admin = state.store.get_user("admin").await.unwrap();
    assert!(admin.is_some());

    let result = state.auth_service.authenticate("admin", "admin123").await;
    assert_eq!(
        result,
        AuthResult {
            authenticated: true,
            is_admin: true,
            is_superadmin: true,
        }
    );
}

#[tokio::test]
async fn initialization_is_idempotent() {
    let state = spawn_state().await;
    state
        .auth_service
        .update_password("admin", "changed")
        .await
        .unwrap();

    state
        .store
        .initialize_credentials(&state.config.security)
        .await
        .unwrap();

    let users = state.auth_service.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(state.auth_service.authenticate("admin", "changed").await.authenticated);
    assert!(!state.auth_service.authenticate("admin", "admin123").await.authenticated);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_indistinguishable() {
    let state = spawn_state().await;
    state
        .auth_service
        .create_user(create("carol", "right"))
        .await
        .unwrap();

    let unknown = state.auth_service.authenticate("nonexistent", "right").await;
    let wrong = state.auth_service.authenticate("carol", "wrong").await;

    assert_eq!(unknown, AuthResult::denied());
    assert_eq!(wrong, AuthResult::denied());
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn create_user_rejects_duplicates_and_empty_fields() {
    let state = spawn_state().await;

    let err = state
        .auth_service
        .create_user(create("admin", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateKey(_)));
    assert_eq!(err.to_string(), "Username already exists");

    let err = state
        .auth_service
        .create_user(create("", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));

    let err = state
        .auth_service
        .create_user(create("u", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));
    assert_eq!(err.to_string(), "Username and password are required");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_of_one_name_leave_a_single_row() {
    let state = spawn_state().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let auth = state.auth_service.clone();
            tokio::spawn(async move { auth.create_user(create("dup", "pw")).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => created += 1,
            Err(AuthError::DuplicateKey(name)) => assert_eq!(name, "dup"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, 1);
    let users = state.auth_service.list_users().await.unwrap();
    assert_eq!(users.iter().filter(|u| u.username == "dup").count(), 1);
}

#[tokio::test]
async fn delete_user_rules() {
    let state = spawn_state().await;

    let err = state.auth_service.delete_user("admin").await.unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
    assert_eq!(err.to_string(), "Cannot delete admin user");

    let err = state
        .auth_service
        .delete_user("nosuchuser")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound(_)));

    state
        .auth_service
        .create_user(create("dave", "pw"))
        .await
        .unwrap();
    state.auth_service.delete_user("dave").await.unwrap();
    assert!(state.store.get_user("dave").await.unwrap().is_none());
}

#[tokio::test]
async fn self_deletion_is_refused() {
    let state = spawn_state().await;
    state
        .auth_service
        .create_user(CreateUser {
            is_admin: true,
            is_superadmin: true,
            ..create("erin", "pw")
        })
        .await
        .unwrap();

    let err = state
        .auth_service
        .delete_user_as("erin", "erin")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
    assert!(state.store.get_user("erin").await.unwrap().is_some());
}

#[tokio::test]
async fn update_password_replaces_old_password() {
    let state = spawn_state().await;
    state
        .auth_service
        .create_user(create("u", "oldpw"))
        .await
        .unwrap();

    state
        .auth_service
        .update_password("u", "newpw")
        .await
        .unwrap();

    assert!(state.auth_service.authenticate("u", "newpw").await.authenticated);
    assert!(!state.auth_service.authenticate("u", "oldpw").await.authenticated);

    let err = state
        .auth_service
        .update_password("u", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidInput(_)));

    let err = state
        .auth_service
        .update_password("ghost", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound(_)));
}

#[tokio::test]
async fn list_users_reports_role_flags() {
    let state = spawn_state().await;
    state
        .auth_service
        .create_user(CreateUser {
            is_admin: true,
            ..create("a", "pw")
        })
        .await
        .unwrap();
    state
        .auth_service
        .create_user(create("b", "pw"))
        .await
        .unwrap();

    let mut users: Vec<(String, bool, bool)> = state
        .auth_service
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| (u.username, u.is_admin, u.is_superadmin))
        .collect();
    users.sort();

    assert_eq!(
        users,
        vec![
            ("a".to_string(), true, false),
            ("admin".to_string(), true, true),
            ("b".to_string(), false, false),
        ]
    );
}

#[tokio::test]
async fn successful_login_records_last_login() {
    let state = spawn_state().await;
    assert!(
        state
            .store
            .get_user("admin")
            .await
            .unwrap()
            .unwrap()
            .last_login
            .is_none()
    );

    assert!(state.auth_service.authenticate("admin", "admin123").await.authenticated);

    let admin = state.store.get_user("admin").await.unwrap().unwrap();
    assert!(admin.last_login.is_some());

    let before = admin.last_login;
    assert!(!state.auth_service.authenticate("admin", "nope").await.authenticated);
    let after = state.store.get_user("admin").await.unwrap().unwrap().last_login;
    assert_eq!(before, after);
}

#[tokio::test]
async fn malformed_stored_hash_denies_login() {
    let state = spawn_state().await;

    let legacy = contec::entities::users::ActiveModel {
        username: Set("legacy".to_string()),
        password_hash: Set("$2b$12$abcdefghijklmnopqrstuv".to_string()),
        is_admin: Set(false),
        is_superadmin: Set(false),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        last_login: Set(None),
    };
    contec::entities::users::Entity::insert(legacy)
        .exec_without_returning(&state.store.conn)
        .await
        .unwrap();

    let result = state.auth_service.authenticate("legacy", "anything").await;
    assert_eq!(result, AuthResult::denied());
}

#[tokio::test]
async fn stored_hashes_are_never_plaintext() {
    let state = spawn_state().await;
    state
        .auth_service
        .create_user(create("frank", "s3cret"))
        .await
        .unwrap();

    let (_, hash) = state
        .store
        .get_user_with_password("frank")
        .await
        .unwrap()
        .unwrap();

    assert_ne!(hash, "s3cret");
    assert!(hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn password_reset_recovers_a_bcrypt_account() {
    let state = spawn_state().await;

    let legacy = contec::entities::users::ActiveModel {
        username: Set("legacy".to_string()),
        password_hash: Set(
            "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW".to_string(),
        ),
        is_admin: Set(true),
        is_superadmin: Set(false),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        last_login: Set(None),
    };
    contec::entities::users::Entity::insert(legacy)
        .exec_without_returning(&state.store.conn)
        .await
        .unwrap();

    assert!(!state.auth_service.authenticate("legacy", "abc123xyz").await.authenticated);

    state
        .auth_service
        .update_password("legacy", "abc123xyz")
        .await
        .unwrap();

    let result = state.auth_service.authenticate("legacy", "abc123xyz").await;
    assert!(result.authenticated);
    assert!(result.is_admin);
}
