//! `eebus-core`: a pure-Rust implementation of the SHIP connection
//! handshake and the SPINE application protocol that rides inside it —
//! the wire layer EEBUS-compatible energy devices use to discover each
//! other, subscribe to data, and exchange control commands.
//!
//! This crate is a thin facade over the workspace's member crates. Each
//! layer is usable on its own:
//!
//! - [`ship_protocol`] — the SHIP frame codec (§4.1 of the protocol).
//! - [`ship_session`] — the SHIP session state machine and its
//!   transport-driving loop (§4.2).
//! - [`spine_protocol`] — the SPINE data model: addresses, the
//!   device/entity/feature tree, and datagram encode/decode (§3, §4.3).
//! - [`spine_dispatch`] — builds outbound datagrams and routes inbound
//!   ones to feature handlers or outstanding requests (§4.3).
//! - [`spine_links`] — the Subscription and Binding managers (§4.4).
//! - [`spine_nodemgmt`] — the Node-Management feature every device
//!   exposes (§4.5).
//! - [`eebus_node`] — the peer registry and connection-role gating that
//!   ties the layers above into a running node (§4.6).

pub use eebus_node;
pub use ship_protocol;
pub use ship_session;
pub use spine_dispatch;
pub use spine_links;
pub use spine_nodemgmt;
pub use spine_protocol;

pub use eebus_node::{ControlMessage, MdnsCollaborator, MdnsEntry, Node, NodeError, NodeEvent, NodeRole, PeerFactory, PeerHandle};
pub use ship_protocol::{decode_frame, encode_frame, ShipFrame, INIT_FRAME};
pub use ship_session::{run_session, DatagramSink, Session, SessionConfig, SessionError};
pub use spine_dispatch::{Dispatcher, DispatchError, FeatureHandler, HandlerOutcome, Sender};
pub use spine_links::{BindingManager, Link, LinkContainer, LinkOutcome, SubscriptionManager};
pub use spine_nodemgmt::NodeManagementHandler;
pub use spine_protocol::{
    CmdClassifier, Command, Datagram, DeviceAddress, DeviceLocal, DeviceRemote, EebusError,
    EntityAddress, EntityLocal, EntityRemote, FeatureAddress, FeatureLocal, FeatureRemote,
    FeatureRole, FeatureType, FunctionData, FunctionType, Header,
};
