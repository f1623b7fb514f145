use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::control::ControlMessage;
use crate::error::NodeError;
use crate::events::NodeEvent;
use crate::mdns::{MdnsCollaborator, MdnsEntry};
use crate::peer::{PeerFactory, PeerHandle};
use crate::role::NodeRole;

/// Owns the `SKI -> Peer` map, the trusted-SKI set, and the single control
/// queue (§4.6). The control queue is the only place Peers are created or
/// torn down, so there is never a race between two connection attempts for
/// the same SKI.
pub struct Node {
    role: NodeRole,
    factory: Box<dyn PeerFactory>,
    peers: Mutex<HashMap<String, PeerHandle>>,
    trusted: Mutex<HashSet<String>>,
    attempts_in_flight: Mutex<HashSet<String>>,
    mdns_snapshot: Mutex<Vec<MdnsEntry>>,
    events: mpsc::UnboundedSender<NodeEvent>,
}

impl Node {
    pub fn new(role: NodeRole, factory: Box<dyn PeerFactory>) -> (Self, mpsc::UnboundedReceiver<NodeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Node {
                role,
                factory,
                peers: Mutex::new(HashMap::new()),
                trusted: Mutex::new(HashSet::new()),
                attempts_in_flight: Mutex::new(HashSet::new()),
                mdns_snapshot: Mutex::new(Vec::new()),
                events,
            },
            rx,
        )
    }

    /// Hosts `mdns` (§4.6): installs the watch callback that, on every
    /// browse tick, replaces the cached snapshot under lock, emits
    /// `MdnsSnapshotChanged` upward, and — if this Node connects outbound —
    /// posts `MdnsEntriesFound` onto its own control queue via `control_tx`
    /// so `run_control_loop`/`handle_control_message` picks it up like any
    /// other control message.
    pub fn start_discovery(self: &std::sync::Arc<Self>, mdns: &mut dyn MdnsCollaborator, control_tx: mpsc::UnboundedSender<ControlMessage>) {
        let node = std::sync::Arc::clone(self);
        mdns.watch(Box::new(move |entries: Vec<MdnsEntry>| {
            *node.mdns_snapshot.lock() = entries.clone();
            let _ = node.events.send(NodeEvent::MdnsSnapshotChanged);
            if node.role.connects_outbound() {
                let _ = control_tx.send(ControlMessage::MdnsEntriesFound(entries));
            }
        }));
    }

    pub fn mdns_snapshot(&self) -> Vec<MdnsEntry> {
        self.mdns_snapshot.lock().clone()
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn is_trusted(&self, ski: &str) -> bool {
        self.trusted.lock().contains(ski)
    }

    pub fn has_active_peer(&self, ski: &str) -> bool {
        self.peers.lock().contains_key(ski)
    }

    /// The sole authentication check in the stack (§4.6): the transport
    /// layer supplies the peer's verified SKI before upgrade, and this is
    /// called to decide whether to proceed.
    pub fn admit_inbound(&self, ski: &str) -> Result<(), NodeError> {
        if !self.role.accepts_inbound() {
            return Err(NodeError::NotTrusted(ski.to_owned()));
        }
        if !self.is_trusted(ski) {
            return Err(NodeError::NotTrusted(ski.to_owned()));
        }
        if self.has_active_peer(ski) {
            return Err(NodeError::AlreadyActive(ski.to_owned()));
        }
        Ok(())
    }

    pub fn register_peer(&self, handle: PeerHandle) {
        let ski = handle.ski.clone();
        self.peers.lock().insert(ski.clone(), handle);
        self.attempts_in_flight.lock().remove(&ski);
        let _ = self.events.send(NodeEvent::PeerConnected { ski });
    }

    /// Processes exactly one control message (§4.6). Exposed separately
    /// from the async drain loop so the dispatch logic is unit-testable
    /// without a runtime driving `recv`.
    pub fn handle_control_message(&self, message: ControlMessage) {
        match message {
            ControlMessage::MdnsEntriesFound(entries) => self.on_mdns_entries_found(entries),
            ControlMessage::ShipConnectionClosed { ski } => self.on_ship_connection_closed(ski),
            ControlMessage::RegisterSki(ski) => {
                self.trusted.lock().insert(ski);
            }
            ControlMessage::UnregisterSki(ski) => self.on_unregister_ski(ski),
        }
    }

    fn on_mdns_entries_found(&self, entries: Vec<crate::mdns::MdnsEntry>) {
        if !self.role.connects_outbound() {
            return;
        }
        for entry in entries {
            if !self.is_trusted(&entry.ski) {
                continue;
            }
            if self.has_active_peer(&entry.ski) {
                continue;
            }
            if !self.attempts_in_flight.lock().insert(entry.ski.clone()) {
                continue;
            }
            match self.factory.connect(&entry.ski, &entry.connect_uri()) {
                Ok(handle) => self.register_peer(handle),
                Err(err) => {
                    warn!(ski = %entry.ski, %err, "outbound connection attempt failed");
                    self.attempts_in_flight.lock().remove(&entry.ski);
                }
            }
        }
    }

    fn on_ship_connection_closed(&self, ski: String) {
        if let Some(mut handle) = self.peers.lock().remove(&ski) {
            handle.stop();
            info!(%ski, "peer session closed");
        }
        self.attempts_in_flight.lock().remove(&ski);
        let _ = self.events.send(NodeEvent::SkiDisconnected { ski });
    }

    fn on_unregister_ski(&self, ski: String) {
        self.trusted.lock().remove(&ski);
        if let Some(mut handle) = self.peers.lock().remove(&ski) {
            handle.stop();
        }
        self.attempts_in_flight.lock().remove(&ski);
    }

    /// Drains `rx` one message at a time until the channel closes,
    /// dispatching each to `handle_control_message` (§5: "One Node task
    /// drains the Node control queue").
    pub async fn run_control_loop(&self, mut rx: mpsc::UnboundedReceiver<ControlMessage>) {
        while let Some(message) = rx.recv().await {
            self.handle_control_message(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdns::MdnsEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc as StdArc;

    struct CountingFactory {
        calls: StdArc<AtomicUsize>,
        fail: bool,
    }

    impl PeerFactory for CountingFactory {
        fn connect(&self, ski: &str, _uri: &str) -> Result<PeerHandle, NodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NodeError::Transport("refused".to_owned()));
            }
            let (tx, _rx) = mpsc::channel(1);
            Ok(PeerHandle {
                ski: ski.to_owned(),
                device_remote: StdArc::new(Mutex::new(spine_protocol::DeviceRemote::new(ski.to_owned()))),
                outbound: tx,
                stop: None,
            })
        }
    }

    fn node_with(fail: bool) -> (Node, StdArc<AtomicUsize>) {
        let calls = StdArc::new(AtomicUsize::new(0));
        let factory = CountingFactory {
            calls: calls.clone(),
            fail,
        };
        let (node, _events) = Node::new(NodeRole::Auto, Box::new(factory));
        (node, calls)
    }

    fn entry(ski: &str, host: &str) -> MdnsEntry {
        MdnsEntry {
            ski: ski.to_owned(),
            host: host.to_owned(),
            port: 4712,
            path: "/ship/".to_owned(),
        }
    }

    #[test]
    fn mdns_entries_found_connects_trusted_unregistered_peers_once() {
        let (node, calls) = node_with(false);
        node.handle_control_message(ControlMessage::RegisterSki("ski-1".to_owned()));

        let entries = vec![entry("ski-1", "peer.local."), entry("ski-untrusted", "other.local.")];
        node.handle_control_message(ControlMessage::MdnsEntriesFound(entries.clone()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(node.has_active_peer("ski-1"));

        node.handle_control_message(ControlMessage::MdnsEntriesFound(entries));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "already-active peer is not reconnected");
    }

    #[test]
    fn admit_inbound_rejects_untrusted_and_duplicate_skis() {
        let (node, _) = node_with(false);
        assert!(node.admit_inbound("ski-1").is_err());

        node.handle_control_message(ControlMessage::RegisterSki("ski-1".to_owned()));
        assert!(node.admit_inbound("ski-1").is_ok());

        let (tx, _rx) = mpsc::channel(1);
        node.register_peer(PeerHandle {
            ski: "ski-1".to_owned(),
            device_remote: StdArc::new(Mutex::new(spine_protocol::DeviceRemote::new("ski-1".to_owned()))),
            outbound: tx,
            stop: None,
        });
        assert!(matches!(node.admit_inbound("ski-1"), Err(NodeError::AlreadyActive(_))));
    }

    #[test]
    fn unregister_ski_tears_down_the_active_peer() {
        let (node, _) = node_with(false);
        node.handle_control_message(ControlMessage::RegisterSki("ski-1".to_owned()));
        node.handle_control_message(ControlMessage::MdnsEntriesFound(vec![entry("ski-1", "peer.local.")]));
        assert!(node.has_active_peer("ski-1"));

        node.handle_control_message(ControlMessage::UnregisterSki("ski-1".to_owned()));
        assert!(!node.has_active_peer("ski-1"));
        assert!(!node.is_trusted("ski-1"));
    }

    struct RecordingMdns {
        callback: Option<Box<dyn Fn(Vec<MdnsEntry>) + Send>>,
    }

    impl MdnsCollaborator for RecordingMdns {
        fn watch(&mut self, on_entries: Box<dyn Fn(Vec<MdnsEntry>) + Send>) {
            self.callback = Some(on_entries);
        }
    }

    #[test]
    fn start_discovery_caches_snapshot_and_posts_control_message_for_outbound_roles() {
        let (node, _calls) = node_with(false);
        let node = StdArc::new(node);
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let mut mdns = RecordingMdns { callback: None };
        node.start_discovery(&mut mdns, control_tx);

        let entries = vec![entry("ski-1", "peer.local.")];
        let callback = mdns.callback.take().expect("watch installs a callback");
        callback(entries.clone());

        assert_eq!(node.mdns_snapshot(), entries);
        match control_rx.try_recv() {
            Ok(ControlMessage::MdnsEntriesFound(got)) => assert_eq!(got, entries),
            other => panic!("expected MdnsEntriesFound, got {other:?}"),
        }
    }

    #[test]
    fn start_discovery_does_not_post_control_message_for_server_only_roles() {
        let (control_tx, mut control_rx) = mpsc::unbounded_channel();
        let mut mdns = RecordingMdns { callback: None };

        // `node_with` always builds `NodeRole::Auto`, which connects outbound;
        // exercise the server-only branch with a fresh Node instead.
        let (server_node, _events) = Node::new(NodeRole::Server, Box::new(CountingFactory {
            calls: StdArc::new(AtomicUsize::new(0)),
            fail: false,
        }));
        let server_node = StdArc::new(server_node);
        server_node.start_discovery(&mut mdns, control_tx);
        let callback = mdns.callback.take().expect("watch installs a callback");
        callback(vec![entry("ski-1", "peer.local.")]);

        assert!(control_rx.try_recv().is_err(), "server role never connects outbound");
        assert_eq!(server_node.mdns_snapshot().len(), 1);
    }

    #[test]
    fn failed_connect_clears_the_in_flight_flag_so_a_retry_can_proceed() {
        let (node, calls) = node_with(true);
        node.handle_control_message(ControlMessage::RegisterSki("ski-1".to_owned()));
        let entries = vec![entry("ski-1", "peer.local.")];
        node.handle_control_message(ControlMessage::MdnsEntriesFound(entries.clone()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!node.has_active_peer("ski-1"));

        node.handle_control_message(ControlMessage::MdnsEntriesFound(entries));
        assert_eq!(calls.load(Ordering::SeqCst), 2, "cleared in-flight flag allows a retry");
    }
}
