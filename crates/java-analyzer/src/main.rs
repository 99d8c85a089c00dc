use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use java_analyzer::config::AnalyzerConfig;
use java_analyzer::server::{RequestHandler, run_stdio, run_tcp};

#[derive(Parser, Debug)]
#[command(name = "java-analyzer", version, about)]
struct Args {
    /// Directory to search for project sources; repeatable.
    #[arg(long = "source-root")]
    source_roots: Vec<PathBuf>,

    /// Directory to search for dependency sources; repeatable.
    #[arg(long = "dependency-root")]
    dependency_roots: Vec<PathBuf>,

    /// Directory holding compiled artifacts, invalidated at startup.
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Config file to use instead of ./java-analyzer.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Connect to 127.0.0.1:PORT instead of serving on stdio.
    #[arg(long)]
    port: Option<u16>,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<String>,
}

fn default_log_path() -> std::path::PathBuf {
    let dir = dirs_or_tmp();
    dir.join("java-analyzer.log")
}

fn dirs_or_tmp() -> std::path::PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = std::path::PathBuf::from(home).join(".java-analyzer");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    std::env::temp_dir()
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let stderr_filter = if args.verbose {
        EnvFilter::new("java_analyzer=debug")
    } else {
        EnvFilter::new("java_analyzer=info")
    };

    let file_filter = if args.verbose {
        EnvFilter::new("java_analyzer=debug")
    } else {
        // Keep baseline lifecycle logs without the heavy debug stream by default.
        EnvFilter::new("java_analyzer=info")
    };

    let log_path = args
        .log_file
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(std::path::Path::new(".")),
        log_path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("java-analyzer.log")),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(file_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(stderr_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    info!("Starting Java Analyzer v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let config = match AnalyzerConfig::load(
        args.config.as_deref(),
        &args.source_roots,
        &args.dependency_roots,
        args.output_root.as_deref(),
    ) {
        Ok(config) => Arc::new(config),
        Err(error) => {
            eprintln!("java-analyzer: {error}");
            std::process::exit(2);
        },
    };

    let handler = RequestHandler::new(config);
    let served = match args.port {
        Some(port) => run_tcp(handler, port).await,
        None => run_stdio(handler).await,
    };
    if let Err(error) = served {
        eprintln!("java-analyzer: transport failed: {error}");
        std::process::exit(1);
    }

    info!("Java Analyzer stopped");
}
