/// How a Node participates in connection establishment (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Only accepts inbound connections.
    Server,
    /// Only initiates outbound connections in response to discovery.
    Client,
    /// Both an inbound listener and outbound connects are active.
    Auto,
}

impl NodeRole {
    pub fn connects_outbound(self) -> bool {
        matches!(self, NodeRole::Client | NodeRole::Auto)
    }

    pub fn accepts_inbound(self) -> bool {
        matches!(self, NodeRole::Server | NodeRole::Auto)
    }
}
