mod config;
mod dashboard;
mod domain;
mod history;
mod presenter;
mod quotes;

use std::fs::OpenOptions;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;

use config::{Config, parse_symbols};
use dashboard::{Dashboard, DashboardError, StatusLevel};
use history::CsvHistory;
use presenter::render_text;
use quotes::{Client, ClientConfig};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// How the process runs after loading config.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    /// Interactive terminal dashboard.
    Tui,
    /// One pass printed to stdout.
    Once,
    /// Copy the history log and exit.
    Export(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    config_path: String,
    symbols: Option<String>,
    mode: Mode,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut parsed = Args {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        symbols: None,
        mode: Mode::Tui,
    };

    for arg in args {
        if let Some(path) = arg.strip_prefix("--config=") {
            parsed.config_path = path.to_string();
        } else if let Some(symbols) = arg.strip_prefix("--symbols=") {
            parsed.symbols = Some(symbols.to_string());
        } else if let Some(dest) = arg.strip_prefix("--export=") {
            parsed.mode = Mode::Export(dest.to_string());
        } else if arg == "--once" {
            parsed.mode = Mode::Once;
        }
    }

    parsed
}

/// Where log output goes.
enum LogSink<'a> {
    Stderr,
    File(&'a str),
    Discard,
}

fn init_tracing(log_level: Option<&str>, sink: LogSink<'_>) -> io::Result<()> {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match sink {
        LogSink::Stderr => builder.with_writer(io::stderr).init(),
        LogSink::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // The terminal UI owns the screen; stray log lines would corrupt it.
        LogSink::Discard => builder.with_writer(io::sink).init(),
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = parse_args(std::env::args().skip(1));

    let mut config = match Config::load(&args.config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(ref symbols) = args.symbols {
        config.symbols = parse_symbols(symbols);
    }

    let sink = match (&args.mode, config.app.log_file.as_deref()) {
        (Mode::Tui, Some(path)) => LogSink::File(path),
        (Mode::Tui, None) => LogSink::Discard,
        _ => LogSink::Stderr,
    };
    if let Err(e) = init_tracing(config.app.log_level.as_deref(), sink) {
        eprintln!("Failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        config = %args.config_path,
        env = %config.app.env,
        mode = ?args.mode,
        "starting {}",
        config.app.name
    );

    match run(&config, args.mode).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "fatal error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, mode: Mode) -> Result<ExitCode, DashboardError> {
    if let Mode::Export(dest) = mode {
        let history = CsvHistory::open(&config.history.path)?;
        let bytes = history.export(&dest)?;
        println!("Exported {} bytes to {}", bytes, dest);
        return Ok(ExitCode::SUCCESS);
    }

    let client = Client::new(ClientConfig::from_broker(&config.broker))?;
    let mut dashboard = Dashboard::from_config(config, client)?;

    match mode {
        Mode::Tui => {
            dashboard::tui::run(&mut dashboard, &config.app.name).await?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            dashboard.run_pass().await;
            print!("{}", render_text(dashboard.views()));
            match dashboard.status() {
                Some(status) if status.level != StatusLevel::Info => {
                    eprintln!("{}", status.message);
                    Ok(ExitCode::FAILURE)
                }
                _ => Ok(ExitCode::SUCCESS),
            }
        }
    }
}
