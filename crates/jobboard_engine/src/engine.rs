use std::collections::BTreeMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use board_logging::{board_debug, board_info};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::decode::decode_records;
use crate::fetch::{ChannelProgressSink, FetchSettings, Fetcher, ReqwestFetcher};
use crate::{EngineEvent, FailureKind, FetchError, FetchGeneration};

enum EngineCommand {
    Start {
        generation: FetchGeneration,
        url: String,
    },
    Cancel {
        generation: FetchGeneration,
    },
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
}

/// Runs fetches on a background runtime. At most one request is live at a time:
/// starting a generation cancels every request started before it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        Self::with_fetcher(Arc::new(ReqwestFetcher::new(settings)))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("jobboard-engine".to_string())
            .spawn(move || run_commands(runtime, fetcher, cmd_rx, event_tx))
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, generation: FetchGeneration, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            generation,
            url: url.into(),
        });
    }

    pub fn cancel(&self, generation: FetchGeneration) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { generation });
    }

    /// Cancels everything in flight and stops the background thread.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_commands(
    runtime: Runtime,
    fetcher: Arc<dyn Fetcher>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut active: BTreeMap<FetchGeneration, CancellationToken> = BTreeMap::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Start { generation, url } => {
                for (previous, token) in std::mem::take(&mut active) {
                    board_debug!("Generation {} superseded by {}", previous, generation);
                    token.cancel();
                }
                let token = CancellationToken::new();
                active.insert(generation, token.clone());
                runtime.spawn(run_fetch(
                    fetcher.clone(),
                    generation,
                    url,
                    token,
                    event_tx.clone(),
                ));
            }
            EngineCommand::Cancel { generation } => {
                if let Some(token) = active.remove(&generation) {
                    token.cancel();
                }
            }
            EngineCommand::Shutdown => break,
        }
    }

    for token in active.values() {
        token.cancel();
    }
    board_info!("Engine stopping");
    runtime.shutdown_timeout(Duration::from_secs(1));
}

async fn run_fetch(
    fetcher: Arc<dyn Fetcher>,
    generation: FetchGeneration,
    url: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelProgressSink::new(event_tx.clone());
    let result = tokio::select! {
        biased;
        () = token.cancelled() => Err(cancelled()),
        fetched = fetcher.fetch(generation, &url, &sink) => {
            fetched.and_then(|body| decode_records(&body))
        }
    };
    // The token may fire between the transport finishing and here.
    let result = if token.is_cancelled() {
        Err(cancelled())
    } else {
        result
    };
    let _ = event_tx.send(EngineEvent::FetchCompleted { generation, result });
}

fn cancelled() -> FetchError {
    FetchError::new(FailureKind::Cancelled, "request abandoned")
}
