use gpt_assist::AssistClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    /// `None` when the server runs without a configured text service; the
    /// assist routes answer 503 in that case.
    pub assist: Option<Arc<AssistClient>>,
    pub event_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(root: PathBuf, assist: Option<AssistClient>) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            root,
            assist: assist.map(Arc::new),
            event_tx: tx,
        }
    }

    /// Broadcast that a project document changed. Mutating routes call this
    /// after a successful save; nobody listening is fine.
    pub fn notify(&self) {
        let _ = self.event_tx.send(());
    }
}
