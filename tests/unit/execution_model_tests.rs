//! Unit tests for executor message (de)serialization.

use remote_spark_kernel::executor::ipc::HostRequest;
use remote_spark_kernel::models::execution::{
    ExecuteOptions, ExecuteReply, ExecuteRequest, ReplyStatus,
};

#[test]
fn default_options_store_history() {
    let options = ExecuteOptions::default();
    assert!(!options.silent);
    assert!(options.store_history);
    assert!(!options.allow_stdin);
}

#[test]
fn internal_options_are_silent_without_history() {
    let options = ExecuteOptions::internal();
    assert!(options.silent);
    assert!(!options.store_history);
}

#[test]
fn reply_keeps_unknown_fields() {
    let reply: ExecuteReply =
        serde_json::from_str(r#"{"status":"ok","execution_count":7}"#).unwrap();

    assert_eq!(reply.status, ReplyStatus::Ok);
    assert!(reply.evalue.is_none());
    assert_eq!(reply.content["execution_count"], 7);
}

#[test]
fn error_reply_exposes_evalue() {
    let reply: ExecuteReply =
        serde_json::from_str(r#"{"status":"error","evalue":"boom","ename":"ValueError"}"#)
            .unwrap();

    assert!(reply.is_error());
    assert_eq!(reply.evalue.as_deref(), Some("boom"));
}

#[test]
fn execute_envelope_is_flat_and_tagged() {
    let request = ExecuteRequest::new("%spark cleanup", ExecuteOptions::internal());
    let value = serde_json::to_value(HostRequest::Execute(request)).unwrap();

    assert_eq!(value["op"], "execute");
    assert_eq!(value["code"], "%spark cleanup");
    assert_eq!(value["silent"], true);
    assert_eq!(value["store_history"], false);
}

#[test]
fn shutdown_envelope() {
    let value = serde_json::to_value(HostRequest::Shutdown { restart: true }).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"op": "shutdown", "restart": true})
    );
}
