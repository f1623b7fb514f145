use std::sync::Arc;

use parking_lot::Mutex;
use ship_protocol::ShipFrame;
use spine_protocol::DeviceRemote;
use tokio::sync::{mpsc, oneshot};

/// A connected remote device: its mirrored tree, and handles onto the
/// independent reader/writer tasks that own its Session (§4.6, §5 — "one
/// Session reader task... one Session writer task").
pub struct PeerHandle {
    pub ski: String,
    pub device_remote: Arc<Mutex<DeviceRemote>>,
    pub outbound: mpsc::Sender<ShipFrame>,
    pub stop: Option<oneshot::Sender<()>>,
}

impl PeerHandle {
    /// Signals the Session's tasks to exit. Idempotent: a second call is a
    /// no-op since the sender was already consumed.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Injected so the Node's control-loop logic is testable without a real
/// WebSocket: given a newly-trusted SKI's resolved URI, establish the
/// transport, construct a client-role Session, and start its tasks.
pub trait PeerFactory: Send + Sync {
    fn connect(&self, ski: &str, uri: &str) -> Result<PeerHandle, crate::error::NodeError>;
}
