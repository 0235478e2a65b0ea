//! Command-line interface and pipeline orchestration

use chrono::{DateTime, Local};
use clap::{ArgGroup, Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::auth::{self, FULL_MAIL_SCOPE};
use crate::cleaner::{self, ChunkProgressCallback};
use crate::client::ProductionGmailClient;
use crate::config::Config;
use crate::dates;
use crate::error::{GmailError, Result};

#[derive(Parser, Debug)]
#[command(name = "gmail-clean")]
#[command(version)]
#[command(about = "Delete old Gmail messages from the command line", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gmail-clean.toml")]
    pub config: PathBuf,

    /// Path to OAuth2 credentials file (overrides config)
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Path to token cache file (overrides config)
    #[arg(long)]
    pub token_cache: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with the Gmail API and verify the connection
    Auth {
        /// Force re-authentication even if a cached token exists
        #[arg(long)]
        force: bool,
    },

    /// Find messages older than a cutoff and delete them in bulk
    #[command(group(ArgGroup::new("cutoff").required(true).args(["months", "before"])))]
    Clean {
        /// Target messages older than this many calendar months
        #[arg(long)]
        months: Option<u32>,

        /// Target messages received on or before this date
        /// (YYYY-MM-DD, interpreted in local time)
        #[arg(long)]
        before: Option<String>,

        /// Actually delete. Without this flag the command is a dry run
        /// that only reports an approximate match count.
        #[arg(long)]
        execute: bool,

        /// Skip the interactive confirmation prompt
        #[arg(long, requires = "execute")]
        yes: bool,
    },

    /// Generate an example configuration file
    InitConfig {
        /// Path to create config file
        #[arg(short, long, default_value = "gmail-clean.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Credentials path: CLI flag wins over config
    pub fn credentials_path(&self, config: &Config) -> PathBuf {
        self.credentials
            .clone()
            .unwrap_or_else(|| config.auth.credentials_path.clone())
    }

    /// Token cache path: CLI flag wins over config
    pub fn token_cache_path(&self, config: &Config) -> PathBuf {
        self.token_cache
            .clone()
            .unwrap_or_else(|| config.auth.token_cache_path.clone())
    }
}

/// Turn the mutually exclusive cutoff flags into a single instant.
///
/// clap already enforces exactly-one-of at parse time; this re-checks
/// so the function stands alone as the pipeline's input validation.
pub fn resolve_cutoff(months: Option<u32>, before: Option<&str>) -> Result<DateTime<Local>> {
    match (months, before) {
        (Some(m), None) => dates::months_ago_to_cutoff(m),
        (None, Some(d)) => dates::parse_date_to_cutoff(d),
        (Some(_), Some(_)) => Err(GmailError::ValidationError(
            "specify either --months or --before, not both".to_string(),
        )),
        (None, None) => Err(GmailError::ValidationError(
            "a cutoff is required: pass --months N or --before YYYY-MM-DD".to_string(),
        )),
    }
}

/// Progress reporter using indicatif
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
    bar_style: ProgressStyle,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed:>6}] {msg}")
            .unwrap()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");

        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed:>6}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap()
            .progress_chars("##-");

        Self {
            multi: MultiProgress::new(),
            spinner_style,
            bar_style,
        }
    }

    pub fn add_spinner(&self, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.spinner_style.clone());
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn add_progress_bar(&self, len: u64, msg: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(self.bar_style.clone());
        pb.set_message(msg.to_string());
        pb
    }

    /// Finish a spinner and clear it from the multi-progress display
    pub fn finish_spinner(&self, pb: &ProgressBar, msg: &str) {
        pb.finish_and_clear();
        println!("  ✓ {}", msg);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// `auth` subcommand: run or refresh the OAuth flow, then verify the
/// connection by fetching the account profile
pub async fn run_auth(cli: &Cli, force: bool) -> Result<()> {
    let config = Config::load(&cli.config).await?;
    let credentials = cli.credentials_path(&config);
    let token_cache = cli.token_cache_path(&config);

    if force && token_cache.exists() {
        tokio::fs::remove_file(&token_cache).await?;
        info!("Removed existing token cache");
    }

    // Triggers the browser consent flow when no valid token is cached
    let hub = auth::initialize_gmail_hub(&credentials, &token_cache).await?;

    if token_cache.exists() {
        auth::secure_token_file(&token_cache).await?;
    }

    println!("Successfully authenticated with Gmail API");
    println!("Token cached at: {:?}", token_cache);

    // Verify the connection end to end - must pin the scope to avoid
    // triggering a second consent flow
    let (_, profile) = hub
        .users()
        .get_profile("me")
        .add_scope(FULL_MAIL_SCOPE)
        .doit()
        .await?;
    println!(
        "Connected to account: {}",
        profile.email_address.unwrap_or_default()
    );

    Ok(())
}

/// `clean` subcommand: discover matching messages, confirm, delete
pub async fn run_clean(
    cli: &Cli,
    months: Option<u32>,
    before: Option<&str>,
    execute: bool,
    assume_yes: bool,
) -> Result<()> {
    let config = Config::load(&cli.config).await?;
    let cutoff = resolve_cutoff(months, before)?;
    let query = dates::build_query(&cutoff);

    info!(
        "Targeting messages before {} (query: {})",
        cutoff.format("%Y-%m-%d %H:%M:%S %Z"),
        query
    );

    let reporter = ProgressReporter::new();

    let auth_spinner = reporter.add_spinner("Authenticating with Gmail API...");
    let hub = auth::initialize_gmail_hub(
        &cli.credentials_path(&config),
        &cli.token_cache_path(&config),
    )
    .await?;
    let client = ProductionGmailClient::new(hub);
    reporter.finish_spinner(&auth_spinner, "Gmail API authenticated");

    if !execute {
        // Dry run: one cheap listing call, no pagination, no deletes
        let spinner = reporter.add_spinner("Counting matching messages...");
        let estimate = cleaner::count_matching(&client, &query).await?;
        reporter.finish_spinner(
            &spinner,
            &format!("Approximately {} matching messages", estimate.display()),
        );

        if let Some(total) = estimate.server_estimate {
            println!("Server estimate: ~{} messages", total);
        }
        println!("\nDry run only. Re-run with --execute to delete.");
        return Ok(());
    }

    let list_spinner = reporter.add_spinner("Listing matching messages...");
    let ids = cleaner::list_message_ids(&client, &query).await?;
    reporter.finish_spinner(&list_spinner, &format!("Found {} messages", ids.len()));

    if ids.is_empty() {
        println!("Nothing to delete.");
        return Ok(());
    }

    if !assume_yes {
        let prompt = format!(
            "Permanently delete {} messages older than {}? This cannot be undone.",
            ids.len(),
            cutoff.format("%Y-%m-%d")
        );
        let confirmed = inquire::Confirm::new(&prompt)
            .with_default(false)
            .prompt()
            .map_err(|e| GmailError::OperationCancelled(e.to_string()))?;

        if !confirmed {
            println!("Aborted. No messages were deleted.");
            return Ok(());
        }
    }

    let pb = reporter.add_progress_bar(ids.len() as u64, "Deleting messages...");
    let pb_clone = pb.clone();
    let on_chunk: ChunkProgressCallback = Arc::new(move |n| pb_clone.inc(n as u64));

    let deleted =
        cleaner::batch_delete_with_progress(&client, &ids, &config.retry_policy(), Some(on_chunk))
            .await?;
    pb.finish_with_message(format!("Deleted {} messages", deleted));

    println!("\nDeleted {} of {} messages.", deleted, ids.len());
    Ok(())
}

/// `init-config` subcommand
pub async fn run_init_config(output: &std::path::Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(GmailError::ConfigError(format!(
            "Configuration file already exists at {:?}. Use --force to overwrite.",
            output
        )));
    }

    Config::create_example(output).await?;
    println!("Created example configuration file at: {:?}", output);
    Ok(())
}
