//! Background snapshot writer.
//!
//! Snapshots are queued on an unbounded channel and written one at a time
//! by a single task, so they reach the store in the order they were queued.

use std::sync::Arc;

use jewel_cache::KvStore;
use jewel_observability::StructuredLogger;
use tokio::sync::{mpsc, oneshot};

enum WriteCommand {
    Persist(Vec<u8>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Dropping it lets the task drain and exit.
pub(crate) struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
    logger: StructuredLogger,
}

impl SnapshotWriter {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub(crate) fn spawn(store: Arc<dyn KvStore>, key: &'static str, logger: StructuredLogger) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, key, rx, logger.clone()));
        Self { tx, logger }
    }

    /// Queue a snapshot without waiting for it to be written.
    pub(crate) fn persist(&self, bytes: Vec<u8>) {
        if self.tx.send(WriteCommand::Persist(bytes)).is_err() {
            self.logger.error("cart writer stopped; snapshot dropped");
        }
    }

    /// Wait until every snapshot queued so far has been handled.
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run(
    store: Arc<dyn KvStore>,
    key: &'static str,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
    logger: StructuredLogger,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Persist(bytes) => {
                if let Err(e) = store.set(key, &bytes).await {
                    logger
                        .error_builder("failed to save cart")
                        .field("key", key)
                        .field("error", e.to_string())
                        .emit();
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
