use crate::mdns::MdnsEntry;

/// Messages drained one at a time by the single Node task (§4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    MdnsEntriesFound(Vec<MdnsEntry>),
    ShipConnectionClosed { ski: String },
    RegisterSki(String),
    UnregisterSki(String),
}
