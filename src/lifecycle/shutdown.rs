//! Stop signal shared by `main`, the server and test harnesses.

use tokio::sync::broadcast;

/// One-shot stop broadcast.
///
/// `HttpServer::run` holds a receiver and begins draining once a value
/// arrives. Clones share the same channel, so a signal task and a test can
/// each own a handle.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // Only one value is ever sent.
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every receiver to stop. Returns how many were listening; zero is
    /// not an error, the server may already be gone.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
