//! Unit tests for `KernelError` display format and classification.

use remote_spark_kernel::KernelError;

#[test]
fn display_uses_kind_prefix() {
    assert_eq!(KernelError::Config("bad".into()).to_string(), "config: bad");
    assert_eq!(KernelError::Fatal("dead".into()).to_string(), "fatal: dead");
    assert_eq!(
        KernelError::MalformedCommand("empty command".into()).to_string(),
        "malformed command: empty command"
    );
    assert_eq!(
        KernelError::Executor("closed".into()).to_string(),
        "executor: closed"
    );
}

#[test]
fn message_strips_the_prefix() {
    let err = KernelError::SessionStart("Failed to create a Livy session.".into());
    assert_eq!(err.message(), "Failed to create a Livy session.");
}

#[test]
fn only_fatal_is_fatal() {
    assert!(KernelError::Fatal("x".into()).is_fatal());
    for err in [
        KernelError::Config("x".into()),
        KernelError::MalformedCommand("x".into()),
        KernelError::UnrecognizedCommand("x".into()),
        KernelError::SessionAlreadyStarted("x".into()),
        KernelError::SessionStart("x".into()),
        KernelError::Executor("x".into()),
        KernelError::Io("x".into()),
    ] {
        assert!(!err.is_fatal(), "{err:?} must not be fatal");
    }
}

#[test]
fn toml_errors_convert_to_config() {
    let err: KernelError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
    assert!(err.to_string().starts_with("config: invalid config"));
}

#[test]
fn io_errors_convert_to_io() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    assert_eq!(KernelError::from(io), KernelError::Io("missing".into()));
}

#[test]
fn error_implements_std_error_trait() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&KernelError::Io("x".into()));
}
