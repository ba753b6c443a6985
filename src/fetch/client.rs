//! HTTP transport for page requests.

use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::query::{SearchRequest, SearchResponse};
use super::{Page, PageSource};
use crate::credential::ApiKey;
use crate::error_handling::PageError;

/// Longest response body excerpt kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Sends the search query to the Omnivore GraphQL endpoint.
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: ApiKey,
}

impl GraphqlClient {
    /// Wraps `http`; every request goes to `endpoint` with `api_key`.
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl PageSource for GraphqlClient {
    async fn fetch_page(
        &self,
        after: Option<&str>,
        filter: &str,
        page_size: u32,
    ) -> Result<Page, PageError> {
        debug!("POST {} after={:?} first={}", self.endpoint, after, page_size);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.api_key.as_str())
            .json(&SearchRequest::new(after, filter, page_size))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PageError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_page())
    }
}
