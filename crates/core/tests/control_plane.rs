//! Caller-facing outcomes of the control plane.

mod support;

use std::sync::Arc;

use flagstore_core::{FlagControlPlane, Outcome, OutcomeStatus};
use flagstore_domain::{FlagStoreError, NewFlag};
use serde_json::json;
use support::repositories::{InMemoryAuditWriter, InMemoryFlagRepository};

fn control_plane() -> (FlagControlPlane, Arc<InMemoryFlagRepository>, Arc<InMemoryAuditWriter>) {
    let flags = Arc::new(InMemoryFlagRepository::new());
    let audit = Arc::new(InMemoryAuditWriter::new());
    (FlagControlPlane::new(flags.clone(), audit.clone()), flags, audit)
}

#[tokio::test]
async fn create_then_read_by_key_returns_the_flag() {
    let (plane, _, _) = control_plane();

    let created = plane
        .create_flag(&json!({
            "name": "f1",
            "enabled": true,
            "project": "api",
            "environment": "prod",
            "description": "first"
        }))
        .await;
    assert_eq!(created.status(), OutcomeStatus::Created);

    let flags = plane.read_flag(&json!({"name": "f1"})).await.into_value().unwrap();
    assert_eq!(flags.len(), 1);
    let flag = &flags[0];
    assert!(flag.enabled);
    assert_eq!(flag.project, "api");
    assert_eq!(flag.environment, "prod");
    assert_eq!(flag.description.as_deref(), Some("first"));
}

#[tokio::test]
async fn duplicate_create_is_a_conflict() {
    let (plane, flags, _) = control_plane();
    let payload = json!({"name": "f1", "enabled": true, "project": "api", "environment": "prod"});

    assert!(plane.create_flag(&payload).await.is_success());
    let second = plane
        .create_flag(&json!({"name": "f1", "enabled": false, "project": "web", "environment": "local"}))
        .await;

    assert_eq!(second.status(), OutcomeStatus::Conflict);
    assert_eq!(second.http_status(), 409);
    let stored = flags.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].project, "api");
}

#[tokio::test]
async fn create_without_enabled_is_bad_input_naming_the_field() {
    let (plane, flags, _) = control_plane();

    let outcome = plane
        .create_flag(&json!({"name": "f1", "project": "api", "environment": "prod"}))
        .await;

    match outcome {
        Outcome::BadInput { field, .. } => assert_eq!(field.as_deref(), Some("enabled")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(flags.calls(), 0);
}

#[tokio::test]
async fn read_flags_filters_by_project() {
    let flags = Arc::new(
        InMemoryFlagRepository::new()
            .with_flag(NewFlag::new("a", true, "api", "prod"))
            .with_flag(NewFlag::new("b", false, "web", "prod"))
            .with_flag(NewFlag::new("c", false, "api", "local")),
    );
    let plane = FlagControlPlane::new(flags, Arc::new(InMemoryAuditWriter::new()));

    let all = plane.read_flags(&json!({})).await.into_value().unwrap();
    assert_eq!(all.len(), 3);

    let api = plane.read_flags(&json!({"project": "api"})).await.into_value().unwrap();
    assert_eq!(api.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["a", "c"]);
}

#[tokio::test]
async fn delete_of_missing_flag_succeeds_with_zero() {
    let (plane, _, _) = control_plane();

    let outcome = plane.delete_flag(&json!({"name": "ghost", "environment": "prod"})).await;

    assert_eq!(outcome.status(), OutcomeStatus::Ok);
    assert_eq!(outcome.into_value().unwrap().deleted_count, 0);
}

#[tokio::test]
async fn storage_failure_is_internal_error() {
    let (plane, flags, _) = control_plane();
    flags.fail_updates_with(FlagStoreError::StorageUnavailable("database is locked".into()));

    let outcome = plane
        .toggle_flag(&json!({"name": "f1", "enabled": true, "environment": "prod", "userName": "alice"}))
        .await;

    assert_eq!(outcome.status(), OutcomeStatus::InternalError);
    assert_eq!(outcome.http_status(), 500);
}

#[tokio::test]
async fn history_follows_toggles() {
    let (plane, _, _) = control_plane();
    plane
        .create_flag(&json!({"name": "f1", "enabled": false, "project": "api", "environment": "prod"}))
        .await;
    for (enabled, user) in [(true, "alice"), (false, "bob")] {
        plane
            .toggle_flag(&json!({"name": "f1", "enabled": enabled, "environment": "prod", "userName": user}))
            .await;
    }

    let history = plane.flag_history("f1", "prod").await.into_value().unwrap();
    assert_eq!(history.iter().map(|r| r.user_name.as_str()).collect::<Vec<_>>(), ["alice", "bob"]);
}

#[tokio::test]
async fn is_enabled_falls_back_to_default() {
    let flags = Arc::new(
        InMemoryFlagRepository::new().with_flag(NewFlag::new("dark-mode", true, "web", "prod")),
    );
    let plane = FlagControlPlane::new(flags, Arc::new(InMemoryAuditWriter::new()));
    let service = plane.service();

    assert!(service.is_enabled("dark-mode", "prod", false).await.unwrap());
    assert!(!service.is_enabled("dark-mode", "local", false).await.unwrap());
    assert!(service.is_enabled("missing", "prod", true).await.unwrap());
}
