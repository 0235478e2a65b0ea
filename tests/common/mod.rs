//! Common test utilities and fixtures
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use gmail_clean::client::{GmailClient, MessagePage};
use gmail_clean::error::{GmailError, Result};

/// Recorded shape of one list_page call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub query: String,
    pub max_results: u32,
    pub page_token: Option<String>,
}

/// Scripted in-memory Gmail client.
///
/// Listing pops from a queue of scripted pages; deletion pops from a
/// queue of scripted outcomes (an exhausted script means success).
/// Every call is recorded so tests can assert exact call counts,
/// ordering, and arguments.
#[derive(Default)]
pub struct FakeGmailClient {
    pages: Mutex<VecDeque<Result<MessagePage>>>,
    delete_script: Mutex<VecDeque<Result<()>>>,
    list_calls: Mutex<Vec<ListCall>>,
    delete_calls: Mutex<Vec<Vec<String>>>,
}

impl FakeGmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose listing returns the given pages in order
    pub fn with_pages(pages: Vec<MessagePage>) -> Self {
        let client = Self::default();
        *client.pages.lock().unwrap() = pages.into_iter().map(Ok).collect();
        client
    }

    pub fn queue_page(&self, page: MessagePage) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    pub fn queue_page_error(&self, err: GmailError) {
        self.pages.lock().unwrap().push_back(Err(err));
    }

    /// Script the outcomes of upcoming batch_delete_chunk calls, in
    /// order. Calls beyond the script succeed.
    pub fn script_deletes(&self, outcomes: Vec<Result<()>>) {
        self.delete_script.lock().unwrap().extend(outcomes);
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_calls.lock().unwrap().len()
    }

    pub fn delete_call_sizes(&self) -> Vec<usize> {
        self.delete_calls.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl GmailClient for FakeGmailClient {
    async fn list_page(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage> {
        self.list_calls.lock().unwrap().push(ListCall {
            query: query.to_string(),
            max_results,
            page_token: page_token.map(String::from),
        });

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected list_page call: page script exhausted")
    }

    async fn batch_delete_chunk(&self, ids: &[String]) -> Result<()> {
        self.delete_calls.lock().unwrap().push(ids.to_vec());
        self.delete_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// A listing page with literal IDs
pub fn page(ids: &[&str], next_token: Option<&str>) -> MessagePage {
    MessagePage {
        ids: ids.iter().map(|s| s.to_string()).collect(),
        next_page_token: next_token.map(String::from),
        result_size_estimate: None,
    }
}

/// A listing page of `count` synthetic IDs with a distinguishing prefix
pub fn synthetic_page(prefix: &str, count: usize, next_token: Option<&str>) -> MessagePage {
    MessagePage {
        ids: synthetic_ids_with_prefix(prefix, count),
        next_page_token: next_token.map(String::from),
        result_size_estimate: None,
    }
}

pub fn synthetic_ids(count: usize) -> Vec<String> {
    synthetic_ids_with_prefix("msg", count)
}

pub fn synthetic_ids_with_prefix(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}_{}", prefix, i)).collect()
}

pub fn rate_limited() -> GmailError {
    GmailError::RateLimitExceeded { retry_after: 1 }
}

pub fn server_error(status: u16) -> GmailError {
    GmailError::ServerError {
        status,
        message: format!("HTTP {}", status),
    }
}

pub fn forbidden() -> GmailError {
    GmailError::Forbidden("insufficient scope".to_string())
}
