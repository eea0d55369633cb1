//! Order ingestion
//!
//! Consumes raw order payloads from a channel, decodes them and hands each
//! one to a [`MessageProcessor`] with its own deadline. Delivery is
//! at-least-once; a replayed order simply replaces the stored one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::context::Context;
use crate::error::{Result, ServiceError};
use crate::models::Order;
use crate::service::OrderService;

/// Receives one decoded order per delivered message.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn save_order(&self, ctx: &Context, order: Order) -> Result<()>;
}

#[async_trait]
impl MessageProcessor for OrderService {
    async fn save_order(&self, ctx: &Context, order: Order) -> Result<()> {
        OrderService::save_order(self, ctx, order).await
    }
}

/// Outcome counters for one consumer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub received: u64,
    pub saved: u64,
    /// Undecodable payloads and orders failing validation
    pub rejected: u64,
    /// Store failures, including expired deadlines
    pub failed: u64,
}

/// Drains a payload channel into a [`MessageProcessor`].
pub struct OrderConsumer {
    processor: Arc<dyn MessageProcessor>,
    source: mpsc::Receiver<Vec<u8>>,
    message_timeout: Duration,
}

impl OrderConsumer {
    pub fn new(
        processor: Arc<dyn MessageProcessor>,
        source: mpsc::Receiver<Vec<u8>>,
        message_timeout: Duration,
    ) -> Self {
        Self {
            processor,
            source,
            message_timeout,
        }
    }

    /// Processes messages until the source closes or `ctx` is done.
    pub async fn run(mut self, ctx: Context) -> IngestStats {
        let mut stats = IngestStats::default();
        info!("Order consumer started");

        loop {
            let payload = tokio::select! {
                biased;
                reason = ctx.done() => {
                    info!(%reason, "Order consumer stopping");
                    break;
                }
                message = self.source.recv() => match message {
                    Some(payload) => payload,
                    None => {
                        info!("Order source closed");
                        break;
                    }
                },
            };

            stats.received += 1;
            Self::handle(
                self.processor.as_ref(),
                ctx.child_with_timeout(self.message_timeout),
                &payload,
                &mut stats,
            )
            .await;
        }

        info!(
            received = stats.received,
            saved = stats.saved,
            rejected = stats.rejected,
            failed = stats.failed,
            "Order consumer finished"
        );
        stats
    }

    async fn handle(
        processor: &dyn MessageProcessor,
        msg_ctx: Context,
        payload: &[u8],
        stats: &mut IngestStats,
    ) {
        let order: Order = match serde_json::from_slice(payload) {
            Ok(order) => order,
            Err(err) => {
                warn!(error = %err, bytes = payload.len(), "Dropping undecodable message");
                stats.rejected += 1;
                return;
            }
        };

        if order.order_uid.is_empty() {
            warn!("Dropping message without order_uid");
            stats.rejected += 1;
            return;
        }

        let uid = order.order_uid.clone();

        match processor.save_order(&msg_ctx, order).await {
            Ok(()) => {
                debug!(uid = %uid, "Message processed");
                stats.saved += 1;
            }
            Err(ServiceError::Validation(err)) => {
                warn!(uid = %uid, error = %err, "Rejected invalid order");
                stats.rejected += 1;
            }
            Err(err) => {
                error!(uid = %uid, error = %err, "Failed to save order");
                stats.failed += 1;
            }
        }
    }
}

/// Forwards each non-blank line of `reader` into `tx` as one payload.
///
/// Ends at EOF, on a read error, or when the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R, tx: mpsc::Sender<Vec<u8>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tx.send(line.into_bytes()).await.is_err() {
                        debug!("Order consumer gone, line reader stopping");
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    error!(error = %err, "Failed to read order input");
                    break;
                }
            }
        }
    })
}
