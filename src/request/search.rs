//! Search and multi-search request descriptors.

use serde::Serialize;
use serde_json::Value;
use crate::request::Fireable;

/// Scope and routing options of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    /// Indices to search. Empty means all indices.
    #[serde(rename = "index", skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<String>,

    /// Document types to search. Empty means all types.
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    /// Shard preference, e.g. `_local` or a session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<String>,

    /// Routing value restricting the search to matching shards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
}

/// A single search against some indices and types.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub params: SearchParams,
    /// Query document, usually produced by the `query` builders.
    pub query: Value,
}

impl SearchRequest {
    /// Search one index and one type. Empty strings mean "all".
    pub fn new(index: &str, doc_type: &str, query: Value) -> Self {
        let non_empty = |s: &str| {
            if s.is_empty() {
                Vec::new()
            } else {
                vec![s.to_string()]
            }
        };

        Self {
            params: SearchParams {
                indices: non_empty(index),
                types: non_empty(doc_type),
                ..SearchParams::default()
            },
            query,
        }
    }

    pub fn with_params(params: SearchParams, query: Value) -> Self {
        Self { params, query }
    }
}

impl Fireable for SearchRequest {
    fn path(&self) -> String {
        let indices = self.params.indices.join(",");
        let types = self.params.types.join(",");
        match (indices.is_empty(), types.is_empty()) {
            (true, true) => "/_search".to_string(),
            (false, true) => format!("/{}/_search", indices),
            (true, false) => format!("/_all/{}/_search", types),
            (false, false) => format!("/{}/{}/_search", indices, types),
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(preference) = &self.params.preference {
            pairs.push(("preference", preference.clone()));
        }
        if let Some(routing) = &self.params.routing {
            pairs.push(("routing", routing.clone()));
        }
        pairs
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.query)
    }
}

/// Several searches sent in one round trip.
///
/// The body is newline-delimited: a header line with the scope of each
/// search, then its query. The service requires a trailing newline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchRequest {
    pub requests: Vec<SearchRequest>,
}

impl MultiSearchRequest {
    pub fn new(requests: Vec<SearchRequest>) -> Self {
        Self { requests }
    }
}

impl From<Vec<SearchRequest>> for MultiSearchRequest {
    fn from(requests: Vec<SearchRequest>) -> Self {
        Self::new(requests)
    }
}

impl Fireable for MultiSearchRequest {
    fn path(&self) -> String {
        "/_msearch".to_string()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        for request in &self.requests {
            serde_json::to_writer(&mut buf, &request.params)?;
            buf.push(b'\n');
            buf.extend(request.body()?);
            buf.push(b'\n');
        }
        Ok(buf)
    }
}
