//! Integration tests for `SessionManager` against a recording executor.

use remote_spark_kernel::kernel::session::{SessionManager, SessionState, CLEANUP_PAYLOAD};
use remote_spark_kernel::models::connection::ConnectionDescriptor;
use remote_spark_kernel::models::execution::ExecuteReply;
use remote_spark_kernel::models::language::SessionLanguage;
use remote_spark_kernel::KernelError;

use super::test_helpers::{test_credentials, RecordingExecutor, Scripted, CREATE_PAYLOAD};

fn manager() -> SessionManager {
    SessionManager::new("test-client", SessionLanguage::Python)
}

#[test]
fn create_payload_names_client_language_and_connection() {
    let connection = ConnectionDescriptor::new(&test_credentials());
    assert_eq!(manager().create_payload(&connection), CREATE_PAYLOAD);
}

#[test]
fn scala_sessions_use_scala_language() {
    let connection = ConnectionDescriptor::new(&test_credentials());
    let payload = SessionManager::new("c", SessionLanguage::Scala).create_payload(&connection);
    assert!(payload.starts_with("%spark add c scala url="), "{payload}");
}

#[tokio::test]
async fn ensure_started_is_idempotent() {
    let executor = RecordingExecutor::default();
    let connection = ConnectionDescriptor::new(&test_credentials());
    let mut session = manager();

    session
        .ensure_started(&executor, &connection)
        .await
        .unwrap();
    session
        .ensure_started(&executor, &connection)
        .await
        .unwrap();

    assert_eq!(executor.codes(), vec![CREATE_PAYLOAD.to_owned()]);
    assert_eq!(session.state(), SessionState::Started);
}

#[tokio::test]
async fn failed_start_leaves_state_not_started() {
    let executor = RecordingExecutor::default();
    executor.push_error("quota exceeded");
    let connection = ConnectionDescriptor::new(&test_credentials());
    let mut session = manager();

    let err = session
        .ensure_started(&executor, &connection)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        KernelError::SessionStart(
            "Failed to create a Livy session.\nException details:\n\t\"quota exceeded\"".into()
        )
    );
    assert_eq!(session.state(), SessionState::NotStarted);
}

#[tokio::test]
async fn stop_without_session_is_a_no_op() {
    let executor = RecordingExecutor::default();
    let mut session = manager();

    session.stop(&executor).await;

    assert!(executor.codes().is_empty());
}

#[tokio::test]
async fn stop_twice_cleans_up_once() {
    let executor = RecordingExecutor::default();
    let connection = ConnectionDescriptor::new(&test_credentials());
    let mut session = manager();
    session
        .ensure_started(&executor, &connection)
        .await
        .unwrap();

    session.stop(&executor).await;
    session.stop(&executor).await;

    assert_eq!(executor.cleanup_count(), 1);
    assert_eq!(session.state(), SessionState::NotStarted);
}

#[tokio::test]
async fn cleanup_failures_are_swallowed() {
    let connection = ConnectionDescriptor::new(&test_credentials());

    for outcome in [
        Scripted::Fail("host gone".into()),
        Scripted::Reply(ExecuteReply::error("no session")),
    ] {
        let executor = RecordingExecutor::default();
        let mut session = manager();
        session
            .ensure_started(&executor, &connection)
            .await
            .unwrap();
        executor.push(outcome);

        session.stop(&executor).await;

        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(
        executor.codes().last().map(String::as_str),
        Some(CLEANUP_PAYLOAD)
    );
    }
}
