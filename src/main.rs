//! Wallgrab main entry point
//!
//! Command-line interface: builds a search filter (optionally from a
//! pasted search URL), prompts for and stores credentials on first use
//! when the filter needs them, and streams discovered items.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wallgrab::config::{load_config, Config};
use wallgrab::crawler::build_crawl;
use wallgrab::item::download_item;
use wallgrab::session::Credentials;
use wallgrab::{CredentialVault, SearchFilter};

/// Wallgrab: a session-aware crawler for the Wallhaven wallpaper search
#[derive(Parser, Debug)]
#[command(name = "wallgrab")]
#[command(version = "1.0.0")]
#[command(about = "Crawl wallhaven search results", long_about = None)]
struct Cli {
    /// Search URL to reproduce; omit for the default toplist filter
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Stop after this many items
    #[arg(short, long)]
    limit: Option<usize>,

    /// Download each discovered item's payload
    #[arg(short, long)]
    download: bool,

    /// Delete stored credentials and exit
    #[arg(long, conflicts_with_all = ["url", "limit", "download"])]
    forget_login: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if cli.forget_login {
        return handle_forget_login(&config);
    }

    let filter = match &cli.url {
        Some(url) => SearchFilter::from_reference(url)
            .with_context(|| format!("cannot use {url} as a search reference"))?,
        None => SearchFilter::new(),
    };
    tracing::info!(
        "Filter: categories={} purity={} sorting={} page={}",
        filter.categories(),
        filter.purity(),
        filter.sorting(),
        filter.page()
    );

    let credentials = if filter.credentials_required() {
        Some(obtain_credentials(&config)?)
    } else {
        None
    };

    let mut crawl = build_crawl(filter, &config, credentials)?;
    let download_client = reqwest::Client::new();
    let download_dir = PathBuf::from(&config.download.directory);

    let mut count = 0usize;
    while let Some(mut item) = crawl.next_item().await? {
        println!("{}", item.id());
        if cli.download {
            match download_item(&download_client, &mut item, &download_dir).await {
                Ok(path) => tracing::debug!("Saved {}", path.display()),
                Err(e) => tracing::error!("Download failed for {}: {}", item.id(), e),
            }
        }

        count += 1;
        if cli.limit.is_some_and(|limit| count >= limit) {
            tracing::info!("Reached item limit of {count}");
            break;
        }
    }

    tracing::info!("Crawl finished after {count} items");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wallgrab=info,warn"),
            1 => EnvFilter::new("wallgrab=debug,info"),
            2 => EnvFilter::new("wallgrab=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Retrieves stored credentials, prompting and storing them on first
/// use.
fn obtain_credentials(config: &Config) -> anyhow::Result<Credentials> {
    let vault = CredentialVault::open(Path::new(&config.vault.service_token_path))?;

    if let Some(credentials) = vault.get()? {
        return Ok(credentials);
    }

    println!("This filter includes explicit results; a wallhaven login is required.");
    print!("Username: ");
    std::io::stdout().flush()?;
    let mut username = String::new();
    std::io::stdin().read_line(&mut username)?;
    let username = username.trim().to_string();
    let password = rpassword::prompt_password("Password: ")?;

    vault.set(&username, &password)?;
    tracing::info!("Credentials stored in the system vault");
    Ok(Credentials { username, password })
}

/// Handles --forget-login: removes stored credentials.
fn handle_forget_login(config: &Config) -> anyhow::Result<()> {
    let vault = CredentialVault::open(Path::new(&config.vault.service_token_path))?;
    vault.delete()?;
    println!("Stored credentials removed.");
    Ok(())
}
