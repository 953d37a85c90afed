//! Request descriptors and response shapes.
//!
//! # Data Flow
//! ```text
//! Caller builds a request (search.rs, index.rs; queries via crate::query)
//!     → Fireable::method / path / query_pairs / body
//!     → Node::execute (<METHOD> <endpoint><path>?<query> with body)
//!     → JSON reply decoded into response.rs types
//! ```
//!
//! # Design Decisions
//! - The dispatcher treats bodies as opaque bytes
//! - Every request kind is a plain value, cheap to move into a worker task

pub mod index;
pub mod response;
pub mod search;

pub use index::{
    BulkItem, BulkParams, BulkRequest, CreateRequest, DeleteRequest, DocumentRequest, IndexParams,
    IndexRequest, UpdateRequest,
};
pub use response::{
    BulkAction, BulkItemResponse, BulkResponse, FacetResponse, Hit, Hits, IndexResponse,
    MultiSearchResponse, SearchResponse, TermCount,
};
pub use search::{MultiSearchRequest, SearchParams, SearchRequest};

use reqwest::Method;

/// Anything that can be fired against a search node.
///
/// A `Fireable` becomes an HTTP request with `method()` to `path()` on the
/// chosen node, carrying `body()`. An empty body is not sent.
pub trait Fireable {
    /// HTTP method. GET by default.
    fn method(&self) -> Method {
        Method::GET
    }

    /// Path on the node, starting with `/`.
    fn path(&self) -> String;

    /// URL query parameters. Empty by default.
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Encoded request body.
    fn body(&self) -> Result<Vec<u8>, serde_json::Error>;
}
