//! Cluster handle and its control loop.
//!
//! # States
//! ```text
//! Running ──shutdown──▶ ShuttingDown ──loop exits──▶ Stopped
//! ```
//!
//! Running is entered before `Cluster::new` returns. While Running, the
//! loop handles one event at a time, checked in this order:
//! - shutdown: leave the loop
//! - probe tick: start a `probe_all` cycle in the loop's probe set
//! - request bundle: `select_best`, then spawn a worker, never awaited
//!
//! On the way out, probe cycles still in flight are aborted and reaped, and
//! queued bundles are dropped. Only then is shutdown acknowledged, so no
//! node's health changes after `shutdown()` returns.
//!
//! Selection runs only inside the loop, so it needs no lock beyond the
//! per-node health locks.

use std::sync::Arc;
use std::time::Duration;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use crate::cluster::bundle::Bundle;
use crate::cluster::types::{ClusterError, ClusterResult};
use crate::config::ClusterConfig;
use crate::health::Prober;
use crate::nodes::{Node, NodeSet};
use crate::observability::metrics;
use crate::request::{
    BulkRequest, BulkResponse, CreateRequest, DeleteRequest, DocumentRequest, Fireable, IndexRequest,
    IndexResponse, MultiSearchRequest, MultiSearchResponse, SearchRequest, SearchResponse, UpdateRequest,
};

const DEFAULT_INTAKE_CAPACITY: usize = 1024;

type SearchBundle = Bundle<SearchRequest, SearchResponse>;
type MultiSearchBundle = Bundle<MultiSearchRequest, MultiSearchResponse>;
type DocumentBundle = Bundle<DocumentRequest, IndexResponse>;
type BulkBundle = Bundle<BulkRequest, BulkResponse>;

/// An actively managed set of search nodes behind one handle.
///
/// Every request is routed to the healthiest node known at the time it
/// reaches the control loop. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct Cluster {
    nodes: NodeSet,
    searches: mpsc::Sender<SearchBundle>,
    multi_searches: mpsc::Sender<MultiSearchBundle>,
    documents: mpsc::Sender<DocumentBundle>,
    bulks: mpsc::Sender<BulkBundle>,
    shutdown: mpsc::Sender<oneshot::Sender<()>>,
}

impl Cluster {
    /// Build a cluster over `endpoints` (each `scheme://host:port`, e.g.
    /// `http://es001:9200`) and start its control loop.
    ///
    /// Nodes are probed every `probe_interval`; each probe gets
    /// `probe_timeout` to answer. The first probe cycle runs one interval
    /// after construction, until then every node is Yellow.
    pub fn new<S: AsRef<str>>(
        endpoints: &[S],
        probe_interval: Duration,
        probe_timeout: Duration,
    ) -> ClusterResult<Self> {
        let prober = Prober::new(probe_timeout)?;
        Self::start(endpoints, probe_interval, prober, DEFAULT_INTAKE_CAPACITY)
    }

    /// Build a cluster from a validated configuration.
    pub fn from_config(config: &ClusterConfig) -> ClusterResult<Self> {
        let prober = Prober::with_path(config.probe.timeout(), config.probe.path.clone())?;
        Self::start(
            config.endpoints.as_slice(),
            config.probe.interval(),
            prober,
            config.dispatch.intake_capacity.max(1),
        )
    }

    fn start<S: AsRef<str>>(
        endpoints: &[S],
        probe_interval: Duration,
        prober: Prober,
        intake_capacity: usize,
    ) -> ClusterResult<Self> {
        // One request client for all nodes; it pools connections per host.
        let client = reqwest::Client::builder()
            .build()
            .map_err(ClusterError::Client)?;

        let mut nodes = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let url = Node::parse_endpoint(endpoint.as_ref())?;
            nodes.push(Arc::new(Node::with_transport(url, client.clone(), prober.clone())));
        }
        let nodes = NodeSet::new(nodes);

        let (searches_tx, searches_rx) = mpsc::channel(intake_capacity);
        let (multi_tx, multi_rx) = mpsc::channel(intake_capacity);
        let (documents_tx, documents_rx) = mpsc::channel(intake_capacity);
        let (bulks_tx, bulks_rx) = mpsc::channel(intake_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let control = ControlLoop {
            nodes: nodes.clone(),
            probe_interval,
            searches: searches_rx,
            multi_searches: multi_rx,
            documents: documents_rx,
            bulks: bulks_rx,
            shutdown: shutdown_rx,
        };
        tokio::spawn(control.run());

        Ok(Self {
            nodes,
            searches: searches_tx,
            multi_searches: multi_tx,
            documents: documents_tx,
            bulks: bulks_tx,
            shutdown: shutdown_tx,
        })
    }

    /// Run a search on the best available node.
    pub async fn search(&self, request: SearchRequest) -> ClusterResult<SearchResponse> {
        submit(&self.searches, "search", request).await
    }

    /// Run a multi-search on the best available node.
    pub async fn multi_search(&self, request: MultiSearchRequest) -> ClusterResult<MultiSearchResponse> {
        submit(&self.multi_searches, "multi_search", request).await
    }

    /// Index (create or replace) a document on the best available node.
    pub async fn index(&self, request: IndexRequest) -> ClusterResult<IndexResponse> {
        self.write(DocumentRequest::Index(request)).await
    }

    /// Create a document on the best available node.
    pub async fn create(&self, request: CreateRequest) -> ClusterResult<IndexResponse> {
        self.write(DocumentRequest::Create(request)).await
    }

    pub async fn update(&self, request: UpdateRequest) -> ClusterResult<IndexResponse> {
        self.write(DocumentRequest::Update(request)).await
    }

    pub async fn delete(&self, request: DeleteRequest) -> ClusterResult<IndexResponse> {
        self.write(DocumentRequest::Delete(request)).await
    }

    /// Send a bulk request to the best available node.
    pub async fn bulk(&self, request: BulkRequest) -> ClusterResult<BulkResponse> {
        submit(&self.bulks, "bulk", request).await
    }

    async fn write(&self, request: DocumentRequest) -> ClusterResult<IndexResponse> {
        let kind = request.kind();
        submit(&self.documents, kind, request).await
    }

    /// Stop the control loop and wait until it has exited.
    ///
    /// Requests still queued fail with `ClusterError::Shutdown`. Requests
    /// already handed to a node run to completion. Probe cycles in flight are
    /// cancelled before this returns. Calling this again is a no-op.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.shutdown.send(ack_tx).await.is_err() {
            return;
        }
        // A dropped ack means a concurrent shutdown won; the loop is gone either way.
        let _ = ack_rx.await;
    }

    /// False once the control loop has stopped.
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_closed()
    }

    /// The cluster's nodes, for inspecting their health.
    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }
}

async fn submit<R, T>(intake: &mpsc::Sender<Bundle<R, T>>, kind: &'static str, request: R) -> ClusterResult<T>
where
    R: Fireable,
    T: DeserializeOwned,
{
    let (bundle, reply) = Bundle::new(kind, request);
    intake.send(bundle).await.map_err(|_| ClusterError::Shutdown)?;
    reply.await.map_err(|_| ClusterError::Shutdown)?
}

struct ControlLoop {
    nodes: NodeSet,
    probe_interval: Duration,
    searches: mpsc::Receiver<SearchBundle>,
    multi_searches: mpsc::Receiver<MultiSearchBundle>,
    documents: mpsc::Receiver<DocumentBundle>,
    bulks: mpsc::Receiver<BulkBundle>,
    shutdown: mpsc::Receiver<oneshot::Sender<()>>,
}

impl ControlLoop {
    async fn run(mut self) {
        tracing::info!(
            nodes = self.nodes.len(),
            probe_interval_ms = self.probe_interval.as_millis() as u64,
            "Cluster control loop starting"
        );

        // A zero period would make the ticker panic.
        let period = self.probe_interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut probes = JoinSet::new();

        let ack = loop {
            tokio::select! {
                biased;

                // None: every handle was dropped without an explicit shutdown.
                ack = self.shutdown.recv() => break ack,
                Some(_) = probes.join_next(), if !probes.is_empty() => {}
                _ = ticker.tick() => {
                    metrics::record_probe_cycle();
                    let nodes = self.nodes.clone();
                    probes.spawn(async move { nodes.probe_all().await });
                }
                Some(bundle) = self.searches.recv() => self.dispatch(bundle),
                Some(bundle) = self.multi_searches.recv() => self.dispatch(bundle),
                Some(bundle) = self.documents.recv() => self.dispatch(bundle),
                Some(bundle) = self.bulks.recv() => self.dispatch(bundle),
            }
        };

        // Health locks are never held across an await, so aborting a cycle
        // midway leaves every node's health consistent.
        probes.abort_all();
        while probes.join_next().await.is_some() {}

        // Dropping the intakes fails any bundle still queued.
        drop(self);
        tracing::info!("Cluster control loop stopped");

        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }

    fn dispatch<R, T>(&self, bundle: Bundle<R, T>)
    where
        R: Fireable + Send + Sync + 'static,
        T: DeserializeOwned + Send + 'static,
    {
        match self.nodes.select_best() {
            Ok(node) => {
                tracing::debug!(
                    request_id = %bundle.id,
                    kind = bundle.kind,
                    endpoint = %node.endpoint(),
                    health = %node.health(),
                    "Dispatching request"
                );
                tokio::spawn(bundle.execute_on(node));
            }
            Err(e) => {
                tracing::warn!(request_id = %bundle.id, kind = bundle.kind, error = %e, "No node to dispatch to");
                bundle.reply(Err(e));
            }
        }
    }
}
