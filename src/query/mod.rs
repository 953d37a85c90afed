//! Query document builders.
//!
//! Builders return plain `serde_json::Value`s so they compose freely and can
//! be dropped into a `SearchRequest` as-is. They only ever serialize.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Give `value` a dynamic key: `wrapper("foo", {"bar": 1})` is `{"foo": {"bar": 1}}`.
pub fn wrapper(name: &str, value: impl Into<Value>) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), value.into());
    Value::Object(map)
}

/// Top-level `{"query": ...}` envelope expected by the search endpoint.
pub fn query_wrapper(query: Value) -> Value {
    wrapper("query", query)
}

pub fn match_all() -> Value {
    wrapper("match_all", Map::new())
}

/// Exact match of one field: `{"term": {field: value}}`.
pub fn term(field: &str, value: impl Into<Value>) -> Value {
    wrapper("term", wrapper(field, value))
}

/// Match any of several values: `{"terms": {field: [values]}}`.
pub fn terms<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Value {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    wrapper("terms", wrapper(field, values))
}

/// Options shared by the full-text query types. Unset options are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenericQueryParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff_frequency: Option<f32>,
}

/// Full-text match on one field: `{"match": {field: {params}}}`.
pub fn match_query(field: &str, params: &GenericQueryParams) -> Value {
    wrapper("match", wrapper(field, to_value(params)))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BoolQueryParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_number_should_match: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

pub fn bool_query(params: &BoolQueryParams) -> Value {
    wrapper("bool", to_value(params))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DisMaxQueryParams {
    pub queries: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<f32>,
}

pub fn dis_max(params: &DisMaxQueryParams) -> Value {
    wrapper("dis_max", to_value(params))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConstantScoreQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
}

pub fn constant_score(params: &ConstantScoreQueryParams) -> Value {
    wrapper("constant_score", to_value(params))
}

/// Rescore the matches of `query` with a script.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomScoreQueryParams {
    pub script: String,
    pub lang: String,
    pub params: Map<String, Value>,
    pub query: Value,
}

pub fn custom_score(params: &CustomScoreQueryParams) -> Value {
    wrapper("custom_score", to_value(params))
}

/// Use a query as a filter: `{"query": query}`.
pub fn query_filter(query: Value) -> Value {
    query_wrapper(query)
}

/// `{field: {"value": value}}`, e.g. the type filter `fielded_filter("type", "tweet")`.
pub fn fielded_filter(field: &str, value: &str) -> Value {
    wrapper(field, json!({ "value": value }))
}

/// Bounds of a range filter. Unset bounds are open.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeFilterParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
}

/// `{"range": {field: {bounds}}}`.
pub fn range_filter(field: &str, params: &RangeFilterParams) -> Value {
    wrapper("range", wrapper(field, to_value(params)))
}

/// Combine filters: all of `and`, plus at least one of `or`.
///
/// With neither set this renders as `{}`.
pub fn boolean_filters(and: Vec<Value>, or: Vec<Value>) -> Value {
    match (and.is_empty(), or.is_empty()) {
        (true, true) => Value::Object(Map::new()),
        (false, true) => wrapper("and", and),
        (true, false) => wrapper("or", or),
        (false, false) => {
            let mut combined = and;
            combined.push(wrapper("or", or));
            wrapper("and", combined)
        }
    }
}

/// Terms facet over `field`, returning the top `size` terms.
pub fn terms_facet(field: &str, size: u32) -> Value {
    wrapper("terms", json!({ "field": field, "size": size }))
}

/// Name a facet so it can be placed in a `facets` object.
pub fn named_facet(name: &str, facet: Value) -> Value {
    wrapper(name, facet)
}

/// Page through the results of `query`, optionally filtered and faceted.
pub fn paged(query: Value, from: u32, size: u32, filter: Option<Value>, facets: Option<Value>) -> Value {
    let mut body = json!({ "from": from, "size": size, "query": query });
    if let Some(filter) = filter {
        body["filter"] = filter;
    }
    if let Some(facets) = facets {
        body["facets"] = facets;
    }
    body
}

fn to_value<T: Serialize>(params: &T) -> Value {
    // Params structs hold only strings, numbers and JSON values.
    serde_json::to_value(params).unwrap_or(Value::Null)
}
