//! End-to-end behaviour of the cluster control loop.

use std::sync::Arc;
use std::time::Duration;
use serde_json::json;
use search_cluster::request::{BulkAction, BulkParams};
use search_cluster::{
    BulkRequest, Cluster, ClusterConfig, ClusterError, CreateRequest, DeleteRequest, Health, IndexParams,
    IndexRequest, MultiSearchRequest, SearchRequest, UpdateRequest,
};

mod common;

#[tokio::test]
async fn test_shutdown_returns_promptly() {
    let endpoints = ["http://host1:9200", "http://host2:9200"];
    let cluster = Cluster::new(&endpoints, Duration::from_secs(30), Duration::from_secs(3)).unwrap();
    assert!(cluster.is_running());

    tokio::time::timeout(Duration::from_secs(1), cluster.shutdown())
        .await
        .expect("shutdown must not wait for a health-check cycle");
    assert!(!cluster.is_running());

    // Second shutdown is a no-op, later requests are refused.
    tokio::time::timeout(Duration::from_secs(1), cluster.shutdown()).await.unwrap();
    let result = cluster.search(SearchRequest::new("", "", json!({}))).await;
    assert!(matches!(result, Err(ClusterError::Shutdown)));
}

#[tokio::test]
async fn test_invalid_endpoint_is_rejected() {
    let result = Cluster::new(&["es001:9200"], Duration::from_secs(30), Duration::from_secs(3));
    assert!(matches!(result, Err(ClusterError::InvalidEndpoint { .. })));
}

#[tokio::test]
async fn test_all_red_cluster_is_unavailable() {
    let a = common::unreachable_addr().await;
    let b = common::unreachable_addr().await;
    let endpoints = [format!("http://{}", a), format!("http://{}", b)];
    let cluster = Cluster::new(&endpoints, Duration::from_millis(100), Duration::from_millis(50)).unwrap();

    let all_red = common::wait_for(Duration::from_secs(5), || {
        cluster.nodes().iter().all(|node| node.health() == Health::Red)
    })
    .await;
    assert!(all_red, "unreachable nodes degrade to Red: {:?}", cluster.nodes().snapshot());

    let result = cluster.search(SearchRequest::new("", "", json!({}))).await;
    assert!(matches!(result, Err(ClusterError::NoHealthyNode)), "{:?}", result);

    cluster.shutdown().await;
}

#[tokio::test]
async fn test_search_prefers_green_node() {
    let healthy = common::start_healthy_node(r#"{"took": 1}"#).await;
    let flaky = common::start_programmable_node(|path| async move {
        if path.starts_with("/_cluster") {
            (200, r#"{"ok": false}"#.to_string())
        } else {
            (200, r#"{"took": 2}"#.to_string())
        }
    })
    .await;

    let endpoints = [format!("http://{}", healthy), format!("http://{}", flaky)];
    let cluster = Cluster::new(&endpoints, Duration::from_millis(100), Duration::from_millis(500)).unwrap();

    let settled = common::wait_for(Duration::from_secs(5), || {
        let snapshot = cluster.nodes().snapshot();
        snapshot[0].1 == Health::Green && snapshot[1].1 == Health::Red
    })
    .await;
    assert!(settled, "{:?}", cluster.nodes().snapshot());

    for _ in 0..20 {
        let response = cluster.search(SearchRequest::new("", "", json!({}))).await.unwrap();
        assert_eq!(response.took, 1);
    }

    cluster.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_searches_get_their_own_replies() {
    // Each node echoes the searched index back as the hit's index.
    let echo = |path: String| async move {
        let index = path.trim_start_matches('/').split('/').next().unwrap_or_default().to_string();
        let body = json!({
            "took": 1,
            "hits": {"total": 1, "hits": [{"_index": index, "_type": "doc", "_id": "1", "_score": 1.0}]}
        });
        (200, body.to_string())
    };
    let a = common::start_programmable_node(echo).await;
    let b = common::start_programmable_node(echo).await;

    let endpoints = [format!("http://{}", a), format!("http://{}", b)];
    let cluster = Arc::new(Cluster::new(&endpoints, Duration::from_secs(30), Duration::from_secs(3)).unwrap());

    let mut handles = Vec::new();
    for i in 0..100 {
        let cluster = cluster.clone();
        handles.push(tokio::spawn(async move {
            let index = format!("idx-{}", i);
            let response = cluster.search(SearchRequest::new(&index, "", json!({}))).await?;
            Ok::<_, ClusterError>((index, response))
        }));
    }

    let all = tokio::time::timeout(Duration::from_secs(10), futures_util::future::join_all(handles))
        .await
        .expect("no deadlock");
    for handle in all {
        let (index, response) = handle.unwrap().unwrap();
        assert_eq!(response.hits.hits[0].index, index);
    }

    cluster.shutdown().await;
}

#[tokio::test]
async fn test_multi_search() {
    let addr = common::start_programmable_node(|path| async move {
        if path == "/_msearch" {
            (200, r#"{"responses": [{"took": 1}, {"took": 2}]}"#.to_string())
        } else {
            (404, r#"{"error": "unexpected path", "status": 404}"#.to_string())
        }
    })
    .await;

    let mut config = ClusterConfig::default();
    config.endpoints.push(format!("http://{}", addr));
    let cluster = Cluster::from_config(&config).unwrap();

    let request = MultiSearchRequest::new(vec![
        SearchRequest::new("i1", "", json!({"query": {"match_all": {}}})),
        SearchRequest::new("i2", "", json!({"query": {"match_all": {}}})),
    ]);
    let response = cluster.multi_search(request).await.unwrap();
    assert_eq!(response.responses.len(), 2);
    assert_eq!(response.responses[1].took, 2);

    cluster.shutdown().await;
}

#[tokio::test]
async fn test_dropping_handle_stops_loop() {
    let addr = common::start_healthy_node(r#"{"took": 1}"#).await;
    let cluster = Cluster::new(&[format!("http://{}", addr)], Duration::from_secs(30), Duration::from_secs(3)).unwrap();
    let response = cluster.search(SearchRequest::new("", "", json!({}))).await.unwrap();
    assert_eq!(response.took, 1);
    drop(cluster);
}

#[tokio::test]
async fn test_shutdown_cancels_health_checks_in_flight() {
    // The status endpoint answers long after shutdown.
    let addr = common::start_programmable_node(|path| async move {
        if path.starts_with("/_cluster") {
            tokio::time::sleep(Duration::from_millis(300)).await;
            (200, r#"{"ok": true}"#.to_string())
        } else {
            (200, r#"{"took": 1}"#.to_string())
        }
    })
    .await;

    let cluster = Cluster::new(&[format!("http://{}", addr)], Duration::from_millis(50), Duration::from_secs(1)).unwrap();

    // One cycle has started and is waiting on the slow node.
    tokio::time::sleep(Duration::from_millis(80)).await;
    cluster.shutdown().await;
    let at_shutdown = cluster.nodes().snapshot();

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(cluster.nodes().snapshot(), at_shutdown);
    assert_eq!(at_shutdown[0].1, Health::Yellow);
    assert!(!cluster.is_running());
}

#[tokio::test]
async fn test_queued_requests_fail_on_shutdown() {
    let addr = common::start_healthy_node(r#"{"took": 1}"#).await;

    let mut config = ClusterConfig::default();
    config.endpoints.push(format!("http://{}", addr));
    config.dispatch.intake_capacity = 4;
    let cluster = Arc::new(Cluster::from_config(&config).unwrap());

    // Queue more searches than the intake holds, then shut down before the
    // control loop gets a turn. Nothing yields in between.
    let mut searches = Vec::new();
    for i in 0..8 {
        let cluster = cluster.clone();
        searches.push(tokio::spawn(async move {
            cluster.search(SearchRequest::new(&format!("idx-{}", i), "", json!({}))).await
        }));
    }
    let stopper = {
        let cluster = cluster.clone();
        tokio::spawn(async move { cluster.shutdown().await })
    };

    let results = tokio::time::timeout(Duration::from_secs(5), futures_util::future::join_all(searches))
        .await
        .expect("queued searches are answered");
    for result in results {
        let result = result.unwrap();
        assert!(matches!(result, Err(ClusterError::Shutdown)), "{:?}", result);
    }

    stopper.await.unwrap();
    assert!(!cluster.is_running());
}

#[tokio::test]
async fn test_document_writes_and_bulk() {
    let addr = common::start_method_aware_node(|method, path| async move {
        let body = match (method.as_str(), path.as_str()) {
            ("PUT", "/twitter/tweet/1?version=4") => {
                r#"{"ok": true, "_index": "twitter", "_type": "tweet", "_id": "1", "_version": 4}"#
            }
            ("PUT", "/twitter/tweet/2/_create") => {
                r#"{"ok": true, "_index": "twitter", "_type": "tweet", "_id": "2", "_version": 1}"#
            }
            ("POST", "/twitter/tweet/1/_update") => {
                r#"{"ok": true, "_index": "twitter", "_type": "tweet", "_id": "1", "_version": 5}"#
            }
            ("DELETE", "/twitter/tweet/1") => {
                r#"{"ok": true, "found": true, "_index": "twitter", "_type": "tweet", "_id": "1"}"#
            }
            ("PUT", "/_bulk?consistency=quorum") => {
                r#"{"took": 3, "items": [
                    {"index": {"_index": "twitter", "_type": "tweet", "_id": "3", "ok": true}},
                    {"delete": {"_index": "twitter", "_type": "tweet", "_id": "2", "ok": true}}
                ]}"#
            }
            _ => return (404, format!(r#"{{"error": "unexpected {} {}", "status": 404}}"#, method, path)),
        };
        (200, body.to_string())
    })
    .await;

    let cluster = Cluster::new(&[format!("http://{}", addr)], Duration::from_secs(30), Duration::from_secs(3)).unwrap();
    let tweet = json!({"user": "kimchy", "message": "trying out Elastic Search"});

    let params = IndexParams {
        version: Some("4".into()),
        ..IndexParams::new("twitter", "tweet", "1")
    };
    let indexed = cluster.index(IndexRequest { params, source: tweet.clone() }).await.unwrap();
    assert!(indexed.ok, "{:?}", indexed.error);
    assert_eq!(indexed.version, 4);

    let created = cluster
        .create(CreateRequest { params: IndexParams::new("twitter", "tweet", "2"), source: tweet.clone() })
        .await
        .unwrap();
    assert_eq!(created.id, "2");

    let updated = cluster
        .update(UpdateRequest {
            params: IndexParams::new("twitter", "tweet", "1"),
            source: json!({"script": "ctx._source.message = \"edited\""}),
        })
        .await
        .unwrap();
    assert_eq!(updated.version, 5);

    let deleted = cluster
        .delete(DeleteRequest { params: IndexParams::new("twitter", "tweet", "1") })
        .await
        .unwrap();
    assert!(deleted.found, "{:?}", deleted.error);

    let bulk = BulkRequest::new(
        BulkParams {
            consistency: Some("quorum".into()),
            ..BulkParams::default()
        },
        vec![
            IndexRequest { params: IndexParams::new("twitter", "tweet", "3"), source: tweet }.into(),
            DeleteRequest { params: IndexParams::new("twitter", "tweet", "2") }.into(),
        ],
    );
    let response = cluster.bulk(bulk).await.unwrap();
    assert_eq!(response.took, 3);
    assert_eq!(response.items[0].action, BulkAction::Index);
    assert_eq!(response.items[1].action, BulkAction::Delete);
    assert_eq!(response.items[1].response.id, "2");

    cluster.shutdown().await;
}
