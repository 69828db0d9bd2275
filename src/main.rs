#![forbid(unsafe_code)]

//! `remote-spark-kernel` — stdin front end for the kernel command layer.
//!
//! Loads configuration, resolves credentials, connects to the host runtime
//! over local IPC, then reads cells from stdin. With `--input-format lines`
//! each line is one cell; with `--input-format json` each line is a JSON
//! object, so multi-line cells and per-cell options can be sent. Replies are
//! printed to stdout as JSON lines; errors and logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use remote_spark_kernel::credentials::{KeyringCredentialProvider, TableCredentialProvider};
use remote_spark_kernel::executor::channel::StderrChannel;
use remote_spark_kernel::executor::ipc::IpcCellExecutor;
use remote_spark_kernel::executor::{CellExecutor, ErrorChannel};
use remote_spark_kernel::input::InputFormat;
use remote_spark_kernel::models::execution::ExecuteRequest;
use remote_spark_kernel::{Kernel, KernelConfig, KernelError, Result};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "remote_spark_kernel=info,warn";

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "remote-spark-kernel",
    about = "Remote Spark kernel command layer",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// How stdin is framed into cells (lines or json).
    #[arg(long, value_enum, default_value_t = InputFormat::Lines)]
    input_format: InputFormat,

    /// Override the credential profile from the config file.
    #[arg(long)]
    profile: Option<String>,

    /// Override the host runtime's IPC socket name.
    #[arg(long)]
    host_ipc: Option<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| KernelError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = KernelConfig::load_from_path(&args.config)?;
    if let Some(profile) = args.profile {
        config.credential_profile = profile;
    }

    let host_ipc = args
        .host_ipc
        .unwrap_or_else(|| config.host_ipc_name.clone());
    let host = IpcCellExecutor::new(host_ipc);
    info!(
        profile = %config.credential_profile,
        host = host.name(),
        input = ?args.input_format,
        "starting kernel"
    );

    let executor: Arc<dyn CellExecutor> = Arc::new(host);
    let errors: Arc<dyn ErrorChannel> = Arc::new(StderrChannel);
    let mut kernel = Kernel::new(config.settings(), executor, errors);

    // Profiles written inline in the config file win over the keychain.
    let table = TableCredentialProvider::new(config.credentials.clone());
    if table.contains(&config.credential_profile) {
        kernel.initialize(&table).await?;
    } else {
        kernel.initialize(&KeyringCredentialProvider).await?;
    }
    info!("kernel ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let stop = stop_requested();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            signal = &mut stop => {
                info!(signal, "stop requested");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match args.input_format.decode(&line) {
                    Ok(Some(cell)) => handle_cell(&mut kernel, cell).await,
                    Ok(None) => {}
                    Err(err) => eprintln!("Error: {err}"),
                },
                Ok(None) => break,
                Err(err) => {
                    error!(%err, "failed to read stdin");
                    break;
                }
            }
        }
    }

    match kernel.shutdown(false).await {
        Ok(reply) => info!(status = ?reply.status, "host shut down"),
        Err(err) => error!(%err, "host shutdown failed"),
    }

    Ok(())
}

async fn handle_cell(kernel: &mut Kernel, cell: ExecuteRequest) {
    match kernel.handle(&cell.code, cell.options).await {
        Ok(reply) => match serde_json::to_string(&reply) {
            Ok(line) => println!("{line}"),
            Err(err) => error!(%err, "failed to serialize reply"),
        },
        // The advisory has already been written by the error channel.
        Err(err @ KernelError::Fatal(_)) => debug!(%err, "cell rejected by fatal error"),
        Err(err) => eprintln!("Error: {err}"),
    }
}

/// Resolves with the name of the first stop signal received.
#[cfg(unix)]
async fn stop_requested() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => tokio::select! {
            name = interrupted() => name,
            _ = terminate.recv() => "SIGTERM",
        },
        Err(err) => {
            warn!(%err, "SIGTERM handler unavailable");
            interrupted().await
        }
    }
}

/// Resolves with the name of the first stop signal received.
#[cfg(not(unix))]
async fn stop_requested() -> &'static str {
    interrupted().await
}

/// Resolves on ctrl-c. Without a handler only stdin EOF stops the kernel.
async fn interrupted() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    "ctrl-c"
}

/// Installs the global subscriber. Logs always go to stderr because stdout
/// carries replies.
fn init_tracing(log_format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| KernelError::Config(format!("failed to init logging: {err}")))
}
