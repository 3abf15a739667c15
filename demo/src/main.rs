//! lotr-demo
//!
//! Command-line front end for the One API client. Prints domain documents
//! as pretty JSON on stdout; logs go to stderr when enabled.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lotr_core::config::{ACCESS_TOKEN_VAR, BASE_URL_VAR};
use lotr_core::{ClientConfig, ListParams, LotrClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod showcase;

const LOGGING_ENABLED_VAR: &str = "SDK_LOGGING_ENABLED";
const LOGGING_LEVEL_VAR: &str = "SDK_LOGGING_LEVEL";

#[derive(Parser, Debug)]
#[command(
    name = "lotr-demo",
    version,
    about = "Query The One API's movies and quotes",
    after_help = "Examples:\n  lotr-demo movies list --params '{\"sort\":{\"key\":\"name\",\"order\":\"asc\"}}'\n  lotr-demo movies quotes 5cd95395de30eff6ebccde5d --params '{\"pagination\":{\"limit\":5}}'\n  lotr-demo quotes list --params '{\"filters\":[{\"key\":\"dialog\",\"value\":{\"regex\":\"ring\"}}]}'\n  lotr-demo quotes get 5cd96e05de30eff6ebcce7e9\n  lotr-demo showcase\n"
)]
struct Cli {
    /// API base URL (default: $LOTR_API_BASE_URL, then the public API)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (default: $LOTR_API_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Movie endpoints
    Movies {
        #[command(subcommand)]
        command: MovieCommands,
    },

    /// Quote endpoints
    Quotes {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Walk through lookups, filters, sorting and pagination
    Showcase,
}

#[derive(Debug, Subcommand)]
enum MovieCommands {
    /// List movies
    List {
        /// List parameters as JSON: {filters, sort, pagination}
        #[arg(long)]
        params: Option<String>,
    },

    /// Get one movie
    Get {
        /// Movie ID
        id: String,
    },

    /// List the quotes of one movie
    Quotes {
        /// Movie ID
        id: String,

        /// List parameters as JSON: {filters, sort, pagination}
        #[arg(long)]
        params: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum QuoteCommands {
    /// List quotes
    List {
        /// List parameters as JSON: {filters, sort, pagination}
        #[arg(long)]
        params: Option<String>,
    },

    /// Get one quote
    Get {
        /// Quote ID
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(|name| std::env::var(name).ok());

    let config = resolve_config(&cli, |name| std::env::var(name).ok())?;
    let client = LotrClient::new(config);

    debug!(command = ?cli.command, "Running command");
    match cli.command {
        Commands::Movies { command } => match command {
            MovieCommands::List { params } => {
                let params = parse_params(params.as_deref())?;
                print_json(&client.movies().list(params.as_ref())?)
            }
            MovieCommands::Get { id } => print_json(&client.movies().get(&id)?),
            MovieCommands::Quotes { id, params } => {
                let params = parse_params(params.as_deref())?;
                print_json(&client.movies().list_quotes(&id, params.as_ref())?)
            }
        },
        Commands::Quotes { command } => match command {
            QuoteCommands::List { params } => {
                let params = parse_params(params.as_deref())?;
                print_json(&client.quotes().list(params.as_ref())?)
            }
            QuoteCommands::Get { id } => print_json(&client.quotes().get(&id)?),
        },
        Commands::Showcase => showcase::run(&client),
    }
}

/// Install a stderr subscriber only when `SDK_LOGGING_ENABLED=true`.
fn init_logging<F>(env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let enabled = env(LOGGING_ENABLED_VAR).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    if !enabled {
        return;
    }
    let level = env(LOGGING_LEVEL_VAR).unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags win over the environment; the environment wins over defaults.
fn resolve_config<F>(cli: &Cli, env: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = ClientConfig::from_lookup(|name| match name {
        ACCESS_TOKEN_VAR => cli.token.clone().or_else(|| env(name)),
        BASE_URL_VAR => cli.base_url.clone().or_else(|| env(name)),
        _ => env(name),
    })
    .with_context(|| format!("pass --token or set {ACCESS_TOKEN_VAR}"))?;

    Ok(match cli.timeout {
        Some(secs) => config.with_timeout(Duration::from_secs(secs)),
        None => config,
    })
}

fn parse_params<K: DeserializeOwned>(raw: Option<&str>) -> Result<Option<ListParams<K>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value: serde_json::Value = serde_json::from_str(raw).context("--params is not valid JSON")?;
    let params = ListParams::from_json(value).context("invalid --params")?;
    Ok(Some(params))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
