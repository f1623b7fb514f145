//! The Node-Management feature every device exposes at `entity=[0],
//! feature=0` with role=special: discovery, subscriptions, bindings, use
//! cases, and destination listing (§4.5).

pub mod bootstrap;
pub mod discovery;
pub mod events;
pub mod handler;

pub use bootstrap::first_connection_datagrams;
pub use discovery::{apply_detailed_discovery_data, build_detailed_discovery_data};
pub use events::NodeEvent;
pub use handler::NodeManagementHandler;
