//! Pagination behavior of the message lister

mod common;

use common::{page, synthetic_page, FakeGmailClient};
use gmail_clean::cleaner::{count_matching, list_message_ids, PAGE_SIZE};
use gmail_clean::error::GmailError;

#[tokio::test]
async fn empty_first_page_returns_empty_set_with_one_call() {
    let client = FakeGmailClient::with_pages(vec![page(&[], None)]);

    let ids = list_message_ids(&client, "before:1700000000").await.unwrap();

    assert!(ids.is_empty());
    assert_eq!(client.list_call_count(), 1);
}

#[tokio::test]
async fn single_page_returns_all_ids() {
    let client = FakeGmailClient::with_pages(vec![page(&["a", "b", "c"], None)]);

    let ids = list_message_ids(&client, "before:1700000000").await.unwrap();

    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(client.list_call_count(), 1);
}

#[tokio::test]
async fn multiple_pages_concatenate_in_page_order() {
    let client = FakeGmailClient::with_pages(vec![
        synthetic_page("p1", 3, Some("tok1")),
        synthetic_page("p2", 2, Some("tok2")),
        synthetic_page("p3", 1, None),
    ]);

    let ids = list_message_ids(&client, "before:1700000000").await.unwrap();

    assert_eq!(
        ids,
        vec!["p1_0", "p1_1", "p1_2", "p2_0", "p2_1", "p3_0"]
    );

    // Exactly one call per page, each bounded to the page-size
    // maximum, each carrying the previous page's token - and the
    // first carrying none
    let calls = client.list_calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.max_results == PAGE_SIZE));
    assert_eq!(calls[0].page_token, None);
    assert_eq!(calls[1].page_token, Some("tok1".to_string()));
    assert_eq!(calls[2].page_token, Some("tok2".to_string()));
}

#[tokio::test]
async fn query_is_passed_through_on_every_call() {
    let client = FakeGmailClient::with_pages(vec![
        page(&["x"], Some("tok")),
        page(&["y"], None),
    ]);

    list_message_ids(&client, "before:1704067200").await.unwrap();

    assert!(client
        .list_calls()
        .iter()
        .all(|c| c.query == "before:1704067200"));
}

#[tokio::test]
async fn last_page_without_messages_contributes_nothing() {
    // A page may carry a token but no message entries; the walk ends
    // quietly on the following empty page
    let client = FakeGmailClient::with_pages(vec![
        page(&["x", "y"], Some("tok2")),
        page(&[], None),
    ]);

    let ids = list_message_ids(&client, "before:1700000000").await.unwrap();

    assert_eq!(ids, vec!["x", "y"]);
    assert_eq!(client.list_call_count(), 2);
}

#[tokio::test]
async fn empty_string_token_ends_the_walk() {
    let client = FakeGmailClient::with_pages(vec![page(&["x"], Some(""))]);

    let ids = list_message_ids(&client, "before:1700000000").await.unwrap();

    assert_eq!(ids, vec!["x"]);
    assert_eq!(client.list_call_count(), 1);
}

#[tokio::test]
async fn listing_failure_propagates_without_retry() {
    // Even a transient failure is the caller's problem: the lister
    // itself never retries
    let client = FakeGmailClient::new();
    client.queue_page_error(common::server_error(503));

    let result = list_message_ids(&client, "before:1700000000").await;

    assert!(matches!(
        result,
        Err(GmailError::ServerError { status: 503, .. })
    ));
    assert_eq!(client.list_call_count(), 1);
}

#[tokio::test]
async fn mid_walk_failure_propagates() {
    let client = FakeGmailClient::with_pages(vec![page(&["a"], Some("tok1"))]);
    client.queue_page_error(common::forbidden());

    let result = list_message_ids(&client, "before:1700000000").await;

    assert!(matches!(result, Err(GmailError::Forbidden(_))));
    assert_eq!(client.list_call_count(), 2);
}

#[tokio::test]
async fn count_matching_uses_a_single_call() {
    let client = FakeGmailClient::with_pages(vec![synthetic_page("m", 500, Some("more"))]);

    let estimate = count_matching(&client, "before:1700000000").await.unwrap();

    assert_eq!(estimate.counted, 500);
    assert!(estimate.truncated);
    assert_eq!(estimate.display(), "500+");
    assert_eq!(client.list_call_count(), 1);
}

#[tokio::test]
async fn count_matching_exact_when_single_page() {
    let client = FakeGmailClient::with_pages(vec![page(&["a", "b"], None)]);

    let estimate = count_matching(&client, "before:1700000000").await.unwrap();

    assert_eq!(estimate.counted, 2);
    assert!(!estimate.truncated);
    assert_eq!(estimate.display(), "2");
}
