//! Omnivore `search` query: request body and response shapes.

use serde::{Deserialize, Serialize};

use super::{Edge, Page, Record};

/// Paginated search. Error payloads come back as `SearchError { errorCodes }`.
pub const SEARCH_QUERY: &str = r#"query Search($after: String, $first: Int, $query: String) {
  search(after: $after, first: $first, query: $query) {
    ... on SearchError {
      errorCodes
    }
    ... on SearchSuccess {
      edges {
        cursor
        node {
          id
          url
        }
      }
      pageInfo {
        hasNextPage
        totalCount
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    query: &'static str,
    variables: SearchVariables<'a>,
}

#[derive(Debug, Serialize)]
struct SearchVariables<'a> {
    after: Option<&'a str>,
    first: u32,
    query: &'a str,
}

impl<'a> SearchRequest<'a> {
    pub(crate) fn new(after: Option<&'a str>, filter: &'a str, page_size: u32) -> Self {
        SearchRequest {
            query: SEARCH_QUERY,
            variables: SearchVariables {
                after,
                first: page_size,
                query: filter,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: Option<SearchPayload>,
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    edges: Option<Vec<WireEdge>>,
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
    #[serde(rename = "errorCodes", default)]
    error_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireEdge {
    cursor: String,
    node: Record,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage", default)]
    has_next_page: bool,
    #[serde(rename = "totalCount")]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

impl SearchResponse {
    /// Classifies the response. A payload without `edges` (search error codes,
    /// a GraphQL `errors` envelope, or a null `data`) becomes [`Page::NoEdges`].
    pub(crate) fn into_page(self) -> Page {
        let mut error_codes: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();

        let Some(search) = self.data.and_then(|d| d.search) else {
            return Page::NoEdges { error_codes };
        };
        error_codes.extend(search.error_codes);

        match search.edges {
            Some(edges) => {
                let (has_more, total_count) = search
                    .page_info
                    .map(|info| (info.has_next_page, info.total_count))
                    .unwrap_or((false, None));
                Page::Edges {
                    edges: edges
                        .into_iter()
                        .map(|e| Edge {
                            cursor: e.cursor,
                            node: e.node,
                        })
                        .collect(),
                    has_more,
                    total_count,
                }
            }
            None => Page::NoEdges { error_codes },
        }
    }
}
