use spine_protocol::{EebusError, FunctionData, Header};

/// What a feature handler did with an inbound `read`/`write`/`call`/`notify`
/// command (§4.3: "dispatch hands the command to the addressed feature's
/// handler and turns the outcome into zero or more outbound datagrams").
pub enum HandlerOutcome {
    /// Send this function data back as a `reply` (for `read`) or `result`
    /// (for `write`/`call`).
    Reply(FunctionData),
    /// The handler rejected the command; turned into a `result` with a
    /// non-zero error number.
    Error(EebusError),
    /// Nothing to send back (e.g. a `notify` the handler only cached).
    NoReply,
}

/// Implemented by each feature's local logic (Node-Management, or any
/// feature a future use case adds) to react to an inbound command
/// addressed to it.
pub trait FeatureHandler {
    fn handle(&mut self, header: &Header, data: FunctionData) -> HandlerOutcome;
}
