use std::sync::Arc;

use fixmycampus::error::AppError;
use fixmycampus::models::{IssuePatch, IssueStatus, NewIssue, Priority, RegisterRequest};
use fixmycampus::storage::{AUTH_KEY, ISSUES_KEY, MemoryKeyValueStore, Persistence, SqliteKeyValueStore};
use fixmycampus::store::{Store, seed};
use fixmycampus::views;
use sqlx::sqlite::SqlitePoolOptions;

async fn open_store(backend: &Arc<MemoryKeyValueStore>) -> Store {
    Store::open(Persistence::new(backend.clone()), seed::credentials())
        .await
        .expect("Failed to open store")
}

fn new_issue(student_id: &str) -> NewIssue {
    NewIssue {
        title: "Flickering lights".to_string(),
        description: "Tube lights in the reading hall flicker all evening".to_string(),
        category: "Maintenance".to_string(),
        location: "Main Library".to_string(),
        priority: Priority::Medium,
        student_id: student_id.to_string(),
        student_name: "John Doe".to_string(),
        student_roll_no: "CS21001".to_string(),
        student_department: "Computer Science".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn test_first_open_installs_and_persists_seed() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;

    let issues = store.issues().await;
    assert_eq!(issues, seed::sample_issues());
    assert!(backend.contains(ISSUES_KEY));
    assert!(!store.auth().await.is_authenticated);
}

#[tokio::test]
async fn test_seed_scenario() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;

    let ids: Vec<String> = store.student_issues("1").await.into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let counts = views::status_counts(&store.issues().await);
    assert_eq!((counts.pending, counts.in_progress, counts.resolved), (1, 1, 1));
}

#[tokio::test]
async fn test_login_with_seed_credentials() {
    for credential in seed::credentials() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let store = open_store(&backend).await;

        let user = store
            .login(&credential.user.email, &credential.password)
            .await
            .expect("Failed to log in");

        assert_eq!(user, credential.user);
        let auth = store.auth().await;
        assert!(auth.is_authenticated);
        assert_eq!(auth.user, Some(user));
        assert!(backend.contains(AUTH_KEY));
    }
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    store.login("admin@college.edu", "admin123").await.unwrap();
    let before = store.auth().await;

    for (email, password) in [
        ("admin@college.edu", "wrong"),
        ("student@college.edu", "admin123"),
        ("nobody@college.edu", "student123"),
        ("ADMIN@college.edu", "admin123"),
    ] {
        let result = store.login(email, password).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    assert_eq!(store.auth().await, before);
}

#[tokio::test]
async fn test_logout_clears_stored_session() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    store.login("student@college.edu", "student123").await.unwrap();

    store.logout().await.expect("Failed to log out");

    assert!(!store.auth().await.is_authenticated);
    assert!(!backend.contains(AUTH_KEY));
}

#[tokio::test]
async fn test_register_signs_in_and_allows_duplicate_email() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;

    let req = RegisterRequest {
        email: "jane@college.edu".to_string(),
        password: "hunter22".to_string(),
        name: "Jane Roe".to_string(),
        roll_no: Some("EE22014".to_string()),
        department: Some("Electrical Engineering".to_string()),
    };
    let first = store.register(req.clone()).await.expect("Failed to register");
    assert_eq!(store.auth().await.user, Some(first.clone()));

    let second = store.register(req).await.expect("Failed to register twice");
    assert_ne!(first.id, second.id);

    store.logout().await.unwrap();
    let user = store.login("jane@college.edu", "hunter22").await.expect("Failed to log in");
    assert_eq!(user.email, "jane@college.edu");
}

#[tokio::test]
async fn test_create_issue_is_pending_and_listed_once() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;

    let issue = store.create_issue(new_issue("1")).await.expect("Failed to create issue");

    assert_eq!(issue.status, IssueStatus::Pending);
    assert_eq!(issue.created_at, issue.updated_at);

    let own = store.student_issues("1").await;
    assert_eq!(own.iter().filter(|i| i.id == issue.id).count(), 1);
    assert_eq!(own.last().map(|i| i.id.as_str()), Some(issue.id.as_str()));
    assert!(store.student_issues("2").await.is_empty());
}

#[tokio::test]
async fn test_update_issue_targets_one_issue() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    let before = store.issues().await;

    let updated = store
        .update_issue("1", IssuePatch::status(IssueStatus::Resolved))
        .await
        .expect("Failed to update issue")
        .expect("Issue not found");

    assert_eq!(updated.status, IssueStatus::Resolved);
    assert!(updated.updated_at >= before[0].updated_at);

    let after = store.issues().await;
    assert_eq!(after[1..], before[1..]);

    store.update_issue("1", IssuePatch::status(IssueStatus::Resolved)).await.unwrap();
    let mut again = store.issues().await;
    again[0].updated_at = after[0].updated_at;
    assert_eq!(again, after);
}

#[tokio::test]
async fn test_update_unknown_issue_is_ignored() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    let before = store.snapshot().await;

    let result = store
        .update_issue("does-not-exist", IssuePatch::status(IssueStatus::Resolved))
        .await
        .expect("update should not fail");

    assert!(result.is_none());
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn test_reopen_restores_issues_and_session() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    store.login("student@college.edu", "student123").await.unwrap();
    store.create_issue(new_issue("1")).await.unwrap();
    store
        .update_issue(
            "2",
            IssuePatch {
                status: Some(IssueStatus::Resolved),
                assigned_to: Some("Maintenance Team".to_string()),
                admin_remarks: Some("Ceiling repaired".to_string()),
            },
        )
        .await
        .unwrap();
    let before = store.snapshot().await;

    let reopened = open_store(&backend).await;

    assert_eq!(reopened.snapshot().await, before);
}

#[tokio::test]
async fn test_storage_failure_leaves_state_unchanged() {
    let backend = Arc::new(MemoryKeyValueStore::new());
    let store = open_store(&backend).await;
    let before = store.snapshot().await;

    backend.set_fail_writes(true);

    assert!(store.create_issue(new_issue("1")).await.is_err());
    assert!(store.update_issue("1", IssuePatch::status(IssueStatus::Resolved)).await.is_err());
    assert!(store.login("student@college.edu", "student123").await.is_err());
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn test_sqlite_backed_store_survives_reopen() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    let backend = Arc::new(SqliteKeyValueStore::new(pool));
    backend.migrate().await.expect("Failed to run migrations");

    let store = Store::open(Persistence::new(backend.clone()), seed::credentials())
        .await
        .expect("Failed to open store");
    let issue = store.create_issue(new_issue("1")).await.unwrap();
    store.login("admin@college.edu", "admin123").await.unwrap();

    let reopened = Store::open(Persistence::new(backend), seed::credentials())
        .await
        .expect("Failed to reopen store");

    let issues = reopened.issues().await;
    assert_eq!(issues.len(), 4);
    assert_eq!(issues[3], issue);
    assert_eq!(
        reopened.current_user().await.map(|u| u.email),
        Some("admin@college.edu".to_string())
    );
}
