//! Gmail API client abstraction
//!
//! The cleanup core consumes exactly two remote operations, expressed
//! as a trait so the pagination and deletion logic can be tested
//! against a fake implementation without any network dependency.

use async_trait::async_trait;
use google_gmail1::{
    api::{BatchDeleteMessagesRequest, ListMessagesResponse},
    hyper_rustls, hyper_util, Gmail,
};
use tracing::debug;

use crate::auth::FULL_MAIL_SCOPE;
use crate::error::Result;

/// One page of a message listing.
#[derive(Debug, Clone, Default)]
pub struct MessagePage {
    /// Message IDs on this page, in response order
    pub ids: Vec<String>,
    /// Continuation token; `None` means this is the last page
    pub next_page_token: Option<String>,
    /// Server-side estimate of the total match count, when provided
    pub result_size_estimate: Option<u32>,
}

/// Trait defining the Gmail operations the cleanup pipeline consumes
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// Fetch one page of message IDs matching `query`.
    ///
    /// `page_token` is the continuation token from the previous page;
    /// the first call passes `None`. At most `max_results` IDs are
    /// returned per page.
    async fn list_page(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage>;

    /// Permanently delete the given messages in one call.
    ///
    /// The Gmail API accepts at most 500 IDs per batchDelete request;
    /// callers are responsible for chunking.
    async fn batch_delete_chunk(&self, ids: &[String]) -> Result<()>;
}

/// Production Gmail client backed by the authenticated API hub
pub struct ProductionGmailClient {
    hub: Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>,
}

impl ProductionGmailClient {
    pub fn new(
        hub: Gmail<
            hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        >,
    ) -> Self {
        Self { hub }
    }

    /// Get the inner hub reference
    pub fn hub(
        &self,
    ) -> &Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>
    {
        &self.hub
    }
}

/// Collapse the API's loosely-typed continuation token into a strict
/// optional: an empty string means the same thing as no token at all.
fn normalize_page_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// Convert a raw listing response into a [`MessagePage`]
fn page_from_response(response: ListMessagesResponse) -> MessagePage {
    let ids = response
        .messages
        .unwrap_or_default()
        .into_iter()
        .filter_map(|msg| msg.id)
        .collect();

    MessagePage {
        ids,
        next_page_token: normalize_page_token(response.next_page_token),
        result_size_estimate: response.result_size_estimate,
    }
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn list_page(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        let mut call = self
            .hub
            .users()
            .messages_list("me")
            .q(query)
            .max_results(max_results);

        if let Some(token) = page_token {
            call = call.page_token(token);
        }

        let (_, response) = call.add_scope(FULL_MAIL_SCOPE).doit().await?;

        let page = page_from_response(response);
        debug!(
            ids = page.ids.len(),
            has_next = page.next_page_token.is_some(),
            "fetched message page"
        );
        Ok(page)
    }

    async fn batch_delete_chunk(&self, ids: &[String]) -> Result<()> {
        let request = BatchDeleteMessagesRequest {
            ids: Some(ids.to_vec()),
        };

        self.hub
            .users()
            .messages_batch_delete(request, "me")
            .add_scope(FULL_MAIL_SCOPE)
            .doit()
            .await?;

        debug!(count = ids.len(), "batch delete acknowledged");
        Ok(())
    }
}
