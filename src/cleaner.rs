//! Message discovery and bulk deletion
//!
//! The pipeline core: [`list_message_ids`] walks every result page of
//! a query and [`batch_delete`] removes the collected IDs in chunks of
//! at most 500, retrying each chunk on transient failures with
//! exponential backoff. Both issue their remote calls strictly one at
//! a time - Gmail's undocumented internal rate limits make serial
//! processing the safe default.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::GmailClient;
use crate::error::Result;

/// Page-size bound for message listing (Gmail API maximum)
pub const PAGE_SIZE: u32 = 500;

/// Maximum IDs per batchDelete call (Gmail API maximum)
pub const MAX_CHUNK_SIZE: usize = 500;

/// Callback invoked after each successfully deleted chunk, with the
/// chunk's size
pub type ChunkProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Backoff schedule for retrying a chunk after a transient failure
///
/// The delay starts at `initial_delay`, doubles after each failed
/// attempt, and is capped at `max_delay`. There is no attempt ceiling:
/// a chunk is retried until it succeeds or fails permanently.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(32),
        }
    }
}

/// Approximate result of a query, from a single non-paginated listing
/// call. Used by the dry-run path, which reports a count without
/// walking every page.
#[derive(Debug, Clone)]
pub struct MatchEstimate {
    /// IDs seen on the first page (0..=500)
    pub counted: usize,
    /// More pages existed beyond the first
    pub truncated: bool,
    /// Server-side estimate of the total match count, when provided
    pub server_estimate: Option<u32>,
}

impl MatchEstimate {
    /// Human-readable rendering: "371" or "500+"
    pub fn display(&self) -> String {
        if self.truncated {
            format!("{}+", self.counted)
        } else {
            self.counted.to_string()
        }
    }
}

/// Number of batchDelete calls needed for `n` message IDs
pub fn chunk_count(n: usize) -> usize {
    (n + MAX_CHUNK_SIZE - 1) / MAX_CHUNK_SIZE
}

/// List every message ID matching `query`, across all result pages.
///
/// IDs are accumulated in response order with no deduplication and no
/// cap. The continuation token from each page feeds the next call; the
/// first call carries none. An absent or empty token ends the walk. A
/// page without message entries contributes zero IDs and is not an
/// error.
///
/// Underlying call failures propagate unchanged - retry policy is the
/// caller's decision, not the lister's.
pub async fn list_message_ids<C>(client: &C, query: &str) -> Result<Vec<String>>
where
    C: GmailClient + ?Sized,
{
    let mut all_ids = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = client
            .list_page(query, PAGE_SIZE, page_token.as_deref())
            .await?;

        all_ids.extend(page.ids);

        page_token = page.next_page_token.filter(|t| !t.is_empty());
        if page_token.is_none() {
            break;
        }
    }

    debug!(total = all_ids.len(), "listing complete");
    Ok(all_ids)
}

/// Estimate how many messages match `query` from its first page only
pub async fn count_matching<C>(client: &C, query: &str) -> Result<MatchEstimate>
where
    C: GmailClient + ?Sized,
{
    let page = client.list_page(query, PAGE_SIZE, None).await?;

    Ok(MatchEstimate {
        counted: page.ids.len(),
        truncated: page.next_page_token.is_some(),
        server_estimate: page.result_size_estimate,
    })
}

/// Permanently delete the given messages, in chunks of at most 500.
///
/// Returns the number of messages deleted, which equals `ids.len()`
/// when every chunk succeeds. An empty input returns 0 without issuing
/// any remote call. Uses the default retry policy and no progress
/// reporting; see [`batch_delete_with_progress`].
pub async fn batch_delete<C>(client: &C, ids: &[String]) -> Result<usize>
where
    C: GmailClient + ?Sized,
{
    batch_delete_with_progress(client, ids, &RetryPolicy::default(), None).await
}

/// Full-control variant of [`batch_delete`].
///
/// Chunks are deleted strictly in sequence, preserving input order.
/// Each chunk is retried independently on transient failures per
/// `policy`; a permanent failure propagates immediately and the failed
/// chunk contributes nothing to the count. Each successful chunk call
/// permanently deletes its messages at the provider - there is no
/// undo, and a count is credited only after the API acknowledges the
/// chunk.
pub async fn batch_delete_with_progress<C>(
    client: &C,
    ids: &[String],
    policy: &RetryPolicy,
    on_chunk: Option<ChunkProgressCallback>,
) -> Result<usize>
where
    C: GmailClient + ?Sized,
{
    if ids.is_empty() {
        return Ok(0);
    }

    let mut deleted = 0usize;

    for chunk in ids.chunks(MAX_CHUNK_SIZE) {
        delete_chunk_with_retry(client, chunk, policy).await?;
        deleted += chunk.len();

        debug!(deleted, total = ids.len(), "chunk deleted");
        if let Some(callback) = &on_chunk {
            callback(chunk.len());
        }
    }

    Ok(deleted)
}

/// Delete one chunk, retrying transient failures indefinitely with
/// exponential backoff
async fn delete_chunk_with_retry<C>(
    client: &C,
    chunk: &[String],
    policy: &RetryPolicy,
) -> Result<()>
where
    C: GmailClient + ?Sized,
{
    let mut delay = policy.initial_delay;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match client.batch_delete_chunk(chunk).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() => {
                warn!(
                    "batch delete of {} messages failed (attempt {}): {}. Retrying in {:?}...",
                    chunk.len(),
                    attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, policy.max_delay);
            }
            Err(e) => return Err(e),
        }
    }
}
