//! CLI entrypoint for stackgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use stackgate_application::QueryKnowledgeUseCase;
use stackgate_infrastructure::{ConfigLoader, FileConfig, RetryingExecutor, StackExchangeClient};
use stackgate_presentation::{Cli, Command, KnowledgeTools, serve_stdio};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error
    let dotenv = dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref(), cli.no_config);
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let _guard = init_logging(cli.verbose, &config);
    if let Some(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }
    info!("Starting stackgate v{}", env!("CARGO_PKG_VERSION"));

    // === Dependency Injection ===
    // One limiter for the whole process
    let limiter = Arc::new(config.rate_limiter());
    let executor = RetryingExecutor::new(limiter, config.retry_policy());
    let client = StackExchangeClient::new(config.client_settings(), executor)
        .context("failed to build HTTP client")?;
    let use_case = QueryKnowledgeUseCase::new(Arc::new(client));
    let tools = KnowledgeTools::new(use_case).with_default_format(config.output.format);

    let output = match cli.effective_command() {
        Command::Serve => {
            serve_stdio(tools).await?;
            return Ok(());
        }
        Command::Search(cmd) => tools.search_by_query(cmd.into()).await?,
        Command::Error(cmd) => tools.search_by_error(cmd.into()).await?,
        Command::Question(cmd) => tools.get_question(cmd.into()).await?,
        Command::Trace(cmd) => {
            let trace = read_trace(cmd.file.as_deref())?;
            tools.analyze_stack_trace(cmd.into_args(trace)).await?
        }
        Command::Advanced(cmd) => tools.advanced_search(cmd.into()).await?,
    };

    println!("{}", output);
    Ok(())
}

/// Log to stderr (stdout carries the MCP protocol), plus a daily file when
/// `[logging] directory` is set.
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match &config.logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "stackgate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .init();
            None
        }
    }
}

fn read_trace(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read trace file {}", path.display())),
        None => {
            let mut trace = String::new();
            std::io::stdin()
                .read_to_string(&mut trace)
                .context("failed to read stack trace from stdin")?;
            Ok(trace)
        }
    }
}
