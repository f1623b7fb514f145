/// Published upward from the Node's control loop (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    SkiDisconnected { ski: String },
    PeerConnected { ski: String },
    MdnsSnapshotChanged,
}
