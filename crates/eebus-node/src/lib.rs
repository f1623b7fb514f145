//! The Peer Registry and Node: the `SKI -> Peer` map, connection-role
//! gating, and the single control queue that serialises every connect/
//! disconnect/trust-change (§4.6).

pub mod control;
pub mod error;
pub mod events;
pub mod mdns;
pub mod node;
pub mod peer;
pub mod role;

pub use control::ControlMessage;
pub use error::NodeError;
pub use events::NodeEvent;
pub use mdns::{MdnsCollaborator, MdnsEntry};
pub use node::Node;
pub use peer::{PeerFactory, PeerHandle};
pub use role::NodeRole;
