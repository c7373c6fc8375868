//! slack-mcp: Slack MCP server binary
//!
//! Usage:
//!   slack-mcp                   - Serve the Slack tools over stdio
//!   slack-mcp --config <path>   - Load settings from a TOML file
//!   slack-mcp --help            - Show help

use std::path::PathBuf;

use sm_core::Config;
use sm_mcp::{SlackMcpServer, SlackTools};
use sm_slack::SlackApiClient;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Serve over stdio, optionally with an explicit config file
    Serve { config_path: Option<PathBuf> },
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args(std::env::args().skip(1))?;

    let config_path = match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("slack-mcp {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Serve { config_path } => config_path,
    };

    // Load .env file
    dotenvy::dotenv().ok();

    let config = match &config_path {
        Some(path) => Config::from_toml_file(path),
        None => Config::load(),
    };

    // stdout carries the MCP stream, so logs go to stderr
    let log_level = config
        .as_ref()
        .map(|c| c.server.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config.map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting {}...", config.server.name);
    tracing::info!("Slack API: {}", config.slack.base_url);

    let client = SlackApiClient::from_config(&config.slack)
        .map_err(|e| anyhow::anyhow!("Failed to create Slack client: {}", e))?;

    match client.auth_test().await {
        Ok(auth) => {
            tracing::info!(team = %auth.team, user = %auth.user, "Slack connection verified");
        }
        Err(e) => {
            tracing::error!("Slack connection test failed: {}", e);
            tracing::error!("Check SLACK_BOT_TOKEN and the app's OAuth scopes");
            std::process::exit(1);
        }
    }

    let server = SlackMcpServer::new(SlackTools::new(client), config.server.name);

    tokio::select! {
        result = server.serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }

    tracing::info!("Slack MCP server stopped");
    Ok(())
}

/// Parse command line arguments
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<RunMode> {
    let mut config_path = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(RunMode::Serve { config_path })
}

/// Print help message
fn print_help() {
    println!("slack-mcp - Slack tools for MCP clients");
    println!();
    println!("Usage:");
    println!("  slack-mcp                  Serve the Slack tools over stdio");
    println!("  slack-mcp --config <path>  Load settings from a TOML file");
    println!("  slack-mcp --help           Show this help message");
    println!("  slack-mcp --version        Show version");
    println!();
    println!("Without --config, ./{} is used when present.", sm_core::config::DEFAULT_CONFIG_FILE);
    println!();
    println!("Environment Variables:");
    println!("  SLACK_BOT_TOKEN        Bot token, xoxb-... (required)");
    println!("  SLACK_API_BASE_URL     Web API endpoint (default: https://slack.com/api)");
    println!("  SLACK_TIMEOUT_SECS     Request timeout in seconds (default: 30)");
    println!("  SLACK_MCP_SERVER_NAME  Name advertised to MCP clients");
    println!("  SLACK_MCP_LOG_LEVEL    Log filter (default: info; RUST_LOG takes precedence)");
}
