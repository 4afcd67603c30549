use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use idea_logging::{idea_debug, idea_error};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::source::{
    ChannelFragmentSink, FragmentSink, FragmentSource, ReqwestFragmentSource, StreamSettings,
};
use crate::{ConnectionId, EngineEvent};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
}

enum EngineCommand {
    Open {
        connection: ConnectionId,
        url: String,
        cancel: CancellationToken,
    },
}

/// Owns the background IO thread. Dropping it stops every stream.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    next_connection: AtomicU64,
}

/// Receiving end for [`EngineEvent`]s from all connections of one engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks until the next event. `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

/// One open stream. Closing (or dropping) it stops delivery immediately.
#[derive(Debug)]
pub struct StreamConnection {
    id: ConnectionId,
    cancel: CancellationToken,
}

impl StreamConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            idea_debug!("Closing stream {}", self.id);
            self.cancel.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.close();
    }
}

impl EngineHandle {
    pub fn new(settings: StreamSettings) -> Result<(Self, EngineEvents), EngineError> {
        Self::with_source(Arc::new(ReqwestFragmentSource::new(settings)))
    }

    pub fn with_source(
        source: Arc<dyn FragmentSource>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("idea-engine-io")
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("idea-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let source = source.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(source, command, event_tx).await;
                    });
                }
                idea_debug!("Engine command channel closed; shutting down runtime");
            })
            .map_err(EngineError::Thread)?;

        let handle = Self {
            cmd_tx,
            next_connection: AtomicU64::new(1),
        };
        Ok((handle, EngineEvents { event_rx }))
    }

    /// Starts streaming from `url`. Events arrive on the paired [`EngineEvents`].
    pub fn open(&self, url: impl Into<String>) -> StreamConnection {
        let connection = self.next_connection.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let command = EngineCommand::Open {
            connection,
            url: url.into(),
            cancel: cancel.clone(),
        };
        if self.cmd_tx.send(command).is_err() {
            idea_error!("Engine thread is gone; stream {} not started", connection);
            cancel.cancel();
        }
        StreamConnection {
            id: connection,
            cancel,
        }
    }
}

/// Drops events once the connection has been cancelled.
struct CancellableSink<S> {
    inner: S,
    cancel: CancellationToken,
}

impl<S: FragmentSink> FragmentSink for CancellableSink<S> {
    fn emit(&self, event: EngineEvent) {
        if !self.cancel.is_cancelled() {
            self.inner.emit(event);
        }
    }
}

async fn handle_command(
    source: Arc<dyn FragmentSource>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Open {
            connection,
            url,
            cancel,
        } => {
            let sink = CancellableSink {
                inner: ChannelFragmentSink::new(event_tx.clone()),
                cancel: cancel.clone(),
            };
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    idea_debug!("Stream {} cancelled", connection);
                }
                result = source.stream(connection, &url, &sink) => {
                    sink.emit(EngineEvent::Ended { connection, result });
                }
            }
        }
    }
}
