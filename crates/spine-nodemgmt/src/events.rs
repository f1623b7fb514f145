use spine_protocol::{EntityAddress, FeatureAddress};

/// Published when a `DetailedDiscoveryData` reply/notify mutates the
/// peer's `DeviceRemote` tree (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    EntityAdded(EntityAddress),
    EntityRemoved(EntityAddress),
    FeatureAdded(FeatureAddress),
    FeatureRemoved(FeatureAddress),
    /// Forwarded verbatim from the Subscription/Binding manager a call
    /// was routed to.
    Link(spine_links::LinkChangeEvent),
}
