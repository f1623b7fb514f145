//! The Sender and Dispatcher: builds outbound SPINE datagrams with a
//! monotonic per-Session counter, and routes inbound datagrams to feature
//! handlers or back to the outstanding request they answer (§4.3).

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod sender;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use handler::{FeatureHandler, HandlerOutcome};
pub use sender::Sender;
