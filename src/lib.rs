//! Gmail Cleanup Tool
//!
//! A command-line tool that deletes old Gmail messages in bulk: build
//! a search query from a cutoff instant, list every matching message
//! ID across result pages, then permanently delete them in chunks of
//! up to 500 with retry and exponential backoff against the
//! rate-limited API.
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_clean::{auth, cleaner, client::ProductionGmailClient, dates};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         ".gmail-clean/token.json".as_ref(),
//!     )
//!     .await?;
//!     let client = ProductionGmailClient::new(hub);
//!
//!     let cutoff = dates::months_ago_to_cutoff(12)?;
//!     let query = dates::build_query(&cutoff);
//!
//!     let ids = cleaner::list_message_ids(&client, &query).await?;
//!     let deleted = cleaner::batch_delete(&client, &ids).await?;
//!     println!("Deleted {} messages", deleted);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cleaner`] - Paginated listing and chunked batch deletion
//! - [`cli`] - Command-line interface and pipeline orchestration
//! - [`client`] - Gmail API client trait and production implementation
//! - [`config`] - Configuration management
//! - [`dates`] - Cutoff computation and query construction
//! - [`error`] - Error types and result alias

pub mod auth;
pub mod cleaner;
pub mod cli;
pub mod client;
pub mod config;
pub mod dates;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result, RETRYABLE_STATUS_CODES};

pub use cleaner::{
    batch_delete, batch_delete_with_progress, count_matching, list_message_ids, MatchEstimate,
    RetryPolicy, MAX_CHUNK_SIZE, PAGE_SIZE,
};

pub use client::{GmailClient, MessagePage, ProductionGmailClient};

pub use config::Config;

pub use cli::{Cli, Commands, ProgressReporter};
