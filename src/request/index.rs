//! Document write requests: index, create, update, delete and bulk.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use crate::request::Fireable;

/// Addressing and write options of one document.
///
/// Serialized, it is the action metadata line of a bulk body. The optional
/// fields double as URL query parameters of single-document requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexParams {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_consistency", skip_serializing_if = "Option::is_none")]
    pub consistency: Option<String>,
    #[serde(rename = "_parent", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "_percolate", skip_serializing_if = "Option::is_none")]
    pub percolate: Option<String>,
    #[serde(rename = "_refresh", skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(rename = "_replication", skip_serializing_if = "Option::is_none")]
    pub replication: Option<String>,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(rename = "_ttl", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(rename = "_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "_version_type", skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
}

impl IndexParams {
    pub fn new(index: &str, doc_type: &str, id: &str) -> Self {
        Self {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// The options that are set, as URL query parameters.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        let options = [
            ("consistency", &self.consistency),
            ("parent", &self.parent),
            ("percolate", &self.percolate),
            ("refresh", &self.refresh),
            ("replication", &self.replication),
            ("routing", &self.routing),
            ("ttl", &self.ttl),
            ("timestamp", &self.timestamp),
            ("version", &self.version),
            ("version_type", &self.version_type),
        ];
        set_values(options)
    }

    /// `/<index>/<type>/<id>` followed by `suffix`, skipping empty segments.
    fn document_path(&self, suffix: Option<&str>) -> String {
        let segments = [self.index.as_str(), self.doc_type.as_str(), self.id.as_str()];
        let mut path = String::new();
        for segment in segments.into_iter().chain(suffix).filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }
}

/// Index (create or replace) a document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    pub params: IndexParams,
    pub source: Value,
}

/// Create a document, failing if it already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub params: IndexParams,
    pub source: Value,
}

/// Partially update a document, e.g. with a script.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub params: IndexParams,
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub params: IndexParams,
}

impl Fireable for IndexRequest {
    fn method(&self) -> Method {
        Method::PUT
    }

    fn path(&self) -> String {
        self.params.document_path(None)
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.values()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.source)
    }
}

impl Fireable for CreateRequest {
    fn method(&self) -> Method {
        Method::PUT
    }

    fn path(&self) -> String {
        self.params.document_path(Some("_create"))
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.values()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.source)
    }
}

impl Fireable for UpdateRequest {
    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        self.params.document_path(Some("_update"))
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.values()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.source)
    }
}

impl Fireable for DeleteRequest {
    fn method(&self) -> Method {
        Method::DELETE
    }

    fn path(&self) -> String {
        self.params.document_path(None)
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.values()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        Ok(Vec::new())
    }
}

/// Any single-document write. All of them answer with an `IndexResponse`.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentRequest {
    Index(IndexRequest),
    Create(CreateRequest),
    Update(UpdateRequest),
    Delete(DeleteRequest),
}

impl DocumentRequest {
    fn inner(&self) -> &dyn Fireable {
        match self {
            DocumentRequest::Index(r) => r,
            DocumentRequest::Create(r) => r,
            DocumentRequest::Update(r) => r,
            DocumentRequest::Delete(r) => r,
        }
    }

    /// Short name used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentRequest::Index(_) => "index",
            DocumentRequest::Create(_) => "create",
            DocumentRequest::Update(_) => "update",
            DocumentRequest::Delete(_) => "delete",
        }
    }
}

impl Fireable for DocumentRequest {
    fn method(&self) -> Method {
        self.inner().method()
    }

    fn path(&self) -> String {
        self.inner().path()
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.inner().query_pairs()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        self.inner().body()
    }
}

/// Options applying to a whole bulk request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkParams {
    pub consistency: Option<String>,
    pub refresh: Option<String>,
    pub replication: Option<String>,
}

impl BulkParams {
    pub fn values(&self) -> Vec<(&'static str, String)> {
        set_values([
            ("consistency", &self.consistency),
            ("refresh", &self.refresh),
            ("replication", &self.replication),
        ])
    }
}

/// One action of a bulk request. Updates cannot be bulked.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkItem {
    Index(IndexRequest),
    Create(CreateRequest),
    Delete(DeleteRequest),
}

impl From<IndexRequest> for BulkItem {
    fn from(request: IndexRequest) -> Self {
        BulkItem::Index(request)
    }
}

impl From<CreateRequest> for BulkItem {
    fn from(request: CreateRequest) -> Self {
        BulkItem::Create(request)
    }
}

impl From<DeleteRequest> for BulkItem {
    fn from(request: DeleteRequest) -> Self {
        BulkItem::Delete(request)
    }
}

#[derive(Serialize)]
enum ActionHeader<'a> {
    #[serde(rename = "index")]
    Index(&'a IndexParams),
    #[serde(rename = "create")]
    Create(&'a IndexParams),
    #[serde(rename = "delete")]
    Delete(&'a IndexParams),
}

impl BulkItem {
    /// Append the action line and, except for deletes, the source line.
    fn encode(&self, buf: &mut Vec<u8>) -> Result<(), serde_json::Error> {
        let (header, source) = match self {
            BulkItem::Index(r) => (ActionHeader::Index(&r.params), Some(&r.source)),
            BulkItem::Create(r) => (ActionHeader::Create(&r.params), Some(&r.source)),
            BulkItem::Delete(r) => (ActionHeader::Delete(&r.params), None),
        };
        serde_json::to_writer(&mut *buf, &header)?;
        buf.push(b'\n');
        if let Some(source) = source {
            serde_json::to_writer(&mut *buf, source)?;
            buf.push(b'\n');
        }
        Ok(())
    }
}

/// Several document writes in one round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRequest {
    pub params: BulkParams,
    pub items: Vec<BulkItem>,
}

impl BulkRequest {
    pub fn new(params: BulkParams, items: Vec<BulkItem>) -> Self {
        Self { params, items }
    }
}

impl Fireable for BulkRequest {
    fn method(&self) -> Method {
        Method::PUT
    }

    fn path(&self) -> String {
        "/_bulk".to_string()
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.values()
    }

    fn body(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        for item in &self.items {
            item.encode(&mut buf)?;
        }
        Ok(buf)
    }
}

fn set_values<const N: usize>(options: [(&'static str, &Option<String>); N]) -> Vec<(&'static str, String)> {
    options
        .into_iter()
        .filter_map(|(name, value)| match value {
            Some(value) if !value.is_empty() => Some((name, value.clone())),
            _ => None,
        })
        .collect()
}
