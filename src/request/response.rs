//! Response shapes returned by the search service.
//!
//! Every field defaults when absent: error replies carry only `error` and
//! `status`, and they must still decode.

use std::collections::HashMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Reply to a single search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchResponse {
    /// Server-side duration in milliseconds.
    pub took: u64,
    pub hits: Hits,
    pub facets: HashMap<String, FacetResponse>,
    pub timed_out: bool,
    /// Error reported by the service, if any.
    pub error: Option<String>,
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Hits {
    pub total: u64,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` under constant-score queries.
    #[serde(rename = "_score")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FacetResponse {
    #[serde(rename = "_type")]
    pub facet_type: String,
    pub missing: i64,
    pub total: i64,
    pub other: i64,
    pub terms: Vec<TermCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TermCount {
    pub term: String,
    pub count: i64,
}

/// Reply to a multi-search, one entry per search in request order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MultiSearchResponse {
    pub responses: Vec<SearchResponse>,
}

/// Reply to a single-document write.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexResponse {
    pub ok: bool,
    pub found: bool,
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: u64,
    pub timed_out: bool,
    pub error: Option<String>,
    pub status: Option<u16>,
}

/// Reply to a bulk request, one item per action in request order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BulkResponse {
    pub took: u64,
    pub items: Vec<BulkItemResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Index,
    Create,
    Delete,
}

/// Outcome of one bulk action.
///
/// On the wire each item is wrapped in an object keyed by its action, e.g.
/// `{"create": {"_id": "1", ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResponse {
    pub action: BulkAction,
    pub response: IndexResponse,
}

impl<'de> Deserialize<'de> for BulkItemResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Envelope {
            create: Option<IndexResponse>,
            index: Option<IndexResponse>,
            delete: Option<IndexResponse>,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        let (action, response) = if let Some(response) = envelope.create {
            (BulkAction::Create, response)
        } else if let Some(response) = envelope.index {
            (BulkAction::Index, response)
        } else if let Some(response) = envelope.delete {
            (BulkAction::Delete, response)
        } else {
            return Err(D::Error::custom(
                "expected bulk response to be create, index, or delete",
            ));
        };
        Ok(Self { action, response })
    }
}
