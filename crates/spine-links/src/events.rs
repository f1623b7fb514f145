use spine_protocol::FeatureAddress;

/// Published whenever a Link is added or removed. Managers return these
/// rather than holding a bus reference; the caller decides what to do with
/// the returned `Vec<LinkChangeEvent>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChangeEvent {
    Added {
        id: u64,
        server_address: FeatureAddress,
        client_address: FeatureAddress,
    },
    Removed {
        id: u64,
        server_address: FeatureAddress,
        client_address: FeatureAddress,
    },
}
