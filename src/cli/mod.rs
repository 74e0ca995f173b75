pub mod api_client;
mod commands;
pub mod error;
mod utils;

#[cfg(test)]
mod api_client_test;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::api_client::{API_URL_ENV, ApiClient};
use crate::cli::commands::list::{ListArgs, list_page};
use crate::cli::error::CliResult;
use crate::cli::utils::parse_filter;

#[derive(Parser)]
#[command(name = "search-table")]
#[command(author, version, about = "Browse paginated list APIs", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: SEARCH_TABLE_API_URL env or http://localhost:3737)
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and show one page of a list endpoint
    List {
        /// Endpoint path, e.g. /api/users
        path: String,
        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,
        /// Items per page
        #[arg(long)]
        size: Option<usize>,
        /// Index of the first page in the server API (0 or 1)
        #[arg(long)]
        first_page: Option<u8>,
        /// Search filter sent as a request parameter (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        /// YAML file with pagination options
        #[arg(long)]
        config: Option<PathBuf>,
        /// Response field holding the pagination object, e.g. data
        #[arg(long)]
        envelope: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

/// Initialize tracing subscriber with env filter, logging to stderr
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_table=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> CliResult<()> {
    init_tracing();

    let cli = Cli::parse();
    let api_client = ApiClient::new(cli.api_url);

    match cli.command {
        Some(Commands::List {
            path,
            page,
            size,
            first_page,
            filters,
            config,
            envelope,
            format,
        }) => {
            let args = ListArgs {
                path,
                page,
                size,
                first_page,
                filters,
                config,
                envelope,
                format,
            };
            let output = list_page(&api_client, args).await?;
            println!("{}", output);
        }
        None => {
            // Show help when no command provided
            let _ = Cli::parse_from(["search-table", "--help"]);
        }
    }

    Ok(())
}
