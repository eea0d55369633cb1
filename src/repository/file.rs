//! Append-only JSON-lines order store
//!
//! Every `create_order` appends one serialized order as a single line and
//! syncs it to disk before returning, so a record is either wholly present
//! or absent. Opening the file replays it into an in-memory index; a later
//! line for the same `order_uid` replaces an earlier one.
//!
//! A write that has taken the file lock runs to completion on its own task,
//! even if the caller stops waiting, so the in-memory index always matches
//! what a reopen would see.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{newest_first, OrderRepository};
use crate::error::StoreError;
use crate::models::Order;

struct Inner {
    file: File,
    index: HashMap<String, Order>,
}

/// Durable order store backed by a JSON-lines file.
pub struct JsonFileRepository {
    path: PathBuf,
    inner: Arc<Mutex<Inner>>,
}

impl JsonFileRepository {
    /// Opens (or creates) the file at `path` and loads every stored order.
    ///
    /// # Errors
    /// - `StoreError::Corrupt` when a line other than the last cannot be parsed
    /// - `StoreError::Io` when the file cannot be opened or read
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let index = Self::replay(&path).await?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        info!(path = %path.display(), orders = index.len(), "Order file opened");

        Ok(Self {
            path,
            inner: Arc::new(Mutex::new(Inner { file, index })),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn replay(path: &Path) -> Result<HashMap<String, Order>, StoreError> {
        let mut index = HashMap::new();

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(index),
            Err(err) => return Err(err.into()),
        };

        let mut lines = BufReader::new(file).lines();
        // A bad line is only tolerated if nothing follows it: that is a write
        // cut short by a crash.
        let mut pending_error: Option<(usize, serde_json::Error)> = None;
        let mut line_no = 0;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            if let Some((line, err)) = pending_error.take() {
                return Err(StoreError::Corrupt {
                    line,
                    reason: err.to_string(),
                });
            }
            match serde_json::from_str::<Order>(&line) {
                Ok(order) => {
                    index.insert(order.order_uid.clone(), order);
                }
                Err(err) => pending_error = Some((line_no, err)),
            }
        }

        if let Some((line, err)) = pending_error {
            warn!(
                path = %path.display(),
                line,
                error = %err,
                "Skipping truncated final record"
            );
        }

        Ok(index)
    }
}

#[async_trait]
impl OrderRepository for JsonFileRepository {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        if order.order_uid.is_empty() {
            return Err(StoreError::Backend("order_uid cannot be empty".to_string()));
        }

        let mut record = serde_json::to_vec(order)?;
        record.push(b'\n');

        let order = order.clone();
        let mut inner = Arc::clone(&self.inner).lock_owned().await;

        let write = tokio::spawn(async move {
            inner.file.write_all(&record).await?;
            inner.file.flush().await?;
            inner.file.sync_data().await?;
            inner.index.insert(order.order_uid.clone(), order);
            Ok::<_, StoreError>(())
        });

        write
            .await
            .map_err(|err| StoreError::Backend(format!("order write task failed: {}", err)))?
    }

    async fn get_order(&self, uid: &str) -> Result<Order, StoreError> {
        self.inner
            .lock()
            .await
            .index
            .get(uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(uid.to_string()))
    }

    async fn get_last_orders(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        let orders = self.inner.lock().await.index.values().cloned().collect();
        Ok(newest_first(orders, limit))
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
