//! Request bundles.
//!
//! A bundle pairs a request with a private, single-use reply channel. The
//! caller keeps the receiving half; whichever worker executes the request
//! owns the bundle and replies exactly once.

use std::sync::Arc;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;
use uuid::Uuid;
use crate::cluster::types::ClusterResult;
use crate::nodes::Node;
use crate::observability::metrics;
use crate::request::Fireable;

pub(crate) type Reply<T> = oneshot::Receiver<ClusterResult<T>>;

pub(crate) struct Bundle<R, T> {
    pub id: Uuid,
    pub kind: &'static str,
    pub request: R,
    reply: oneshot::Sender<ClusterResult<T>>,
}

impl<R, T> Bundle<R, T>
where
    R: Fireable,
    T: DeserializeOwned,
{
    pub fn new(kind: &'static str, request: R) -> (Self, Reply<T>) {
        let (reply, rx) = oneshot::channel();
        let bundle = Self {
            id: Uuid::new_v4(),
            kind,
            request,
            reply,
        };
        (bundle, rx)
    }

    /// Deliver the outcome to the waiting caller. Consumes the bundle, so a
    /// second reply is impossible.
    pub fn reply(self, result: ClusterResult<T>) {
        metrics::record_request(self.kind, if result.is_ok() { "ok" } else { "error" });
        if self.reply.send(result).is_err() {
            tracing::debug!(request_id = %self.id, kind = self.kind, "Caller dropped before reply");
        }
    }

    /// Execute the request on `node` and reply with the outcome.
    pub async fn execute_on(self, node: Arc<Node>) {
        let result: ClusterResult<T> = node.execute(&self.request).await;
        if let Err(e) = &result {
            tracing::debug!(
                request_id = %self.id,
                endpoint = %node.endpoint(),
                error = %e,
                "Request failed"
            );
        }
        self.reply(result);
    }
}
