// Shared test helpers for mock GraphQL servers and records.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::ops::Range;
use std::time::Duration;

use omnivore_export::{ApiKey, CredentialSource, FetchConfig, Record};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9";
pub const GRAPHQL_PATH: &str = "/api/graphql";

#[allow(dead_code)]
pub fn api_key() -> ApiKey {
    ApiKey::parse(TEST_API_KEY, CredentialSource::Flag).expect("test key is valid")
}

/// Fetch settings pointing at the mock server, with millisecond delays.
#[allow(dead_code)]
pub fn fetch_config(server: &MockServer, page_size: u32) -> FetchConfig {
    FetchConfig {
        endpoint: format!("{}{}", server.uri(), GRAPHQL_PATH),
        page_size,
        retry_delay: Duration::from_millis(1),
        max_retries: Some(3),
        timeout_seconds: 5,
    }
}

/// Cursor the server hands out for record `i`.
pub fn cursor_for(i: usize) -> String {
    format!("c{i}")
}

/// The node the server returns for record `i`.
pub fn node(i: usize) -> Value {
    json!({"id": format!("id-{i}"), "url": format!("https://example.com/articles/{i}")})
}

#[allow(dead_code)]
pub fn record(i: usize) -> Record {
    node(i).as_object().cloned().expect("node is an object")
}

#[allow(dead_code)]
/// A `SearchSuccess` body carrying records `ids`.
pub fn search_page(ids: Range<usize>, has_more: bool, total: usize) -> Value {
    let edges: Vec<Value> = ids
        .map(|i| json!({"cursor": cursor_for(i), "node": node(i)}))
        .collect();
    json!({
        "data": {"search": {
            "edges": edges,
            "pageInfo": {"hasNextPage": has_more, "totalCount": total}
        }}
    })
}

#[allow(dead_code)]
/// Matches requests resuming after `after` (`None` = first page).
pub fn request_after(after: Option<&str>) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("Authorization", TEST_API_KEY))
        .and(body_partial_json(json!({"variables": {"after": after}})))
}

#[allow(dead_code)]
/// Serves `total` records in pages of `page_size`, each page exactly once.
pub async fn mount_collection(server: &MockServer, total: usize, page_size: usize) {
    let mut start = 0;
    loop {
        let end = (start + page_size).min(total);
        let after = start.checked_sub(1).map(cursor_for);
        let has_more = end < total;
        request_after(after.as_deref())
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_page(start..end, has_more, total)),
            )
            .expect(1)
            .mount(server)
            .await;
        if !has_more {
            break;
        }
        start = end;
    }
}
