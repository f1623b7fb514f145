use crate::events::LinkChangeEvent;
use crate::manager::LinkManagerCore;
use crate::outcome::LinkOutcome;
use spine_protocol::{DeviceLocal, DeviceRemote, FeatureAddress, LinkEntryWire, PartialFeatureAddress};

/// Structurally identical to `SubscriptionManager`, but its link means
/// write-authorisation rather than observation, and `add_binding` enforces
/// an extra rule: a local server feature may have at most one remote
/// binding, checked with a linear scan before insert (§4.4).
#[derive(Default)]
pub struct BindingManager {
    core: LinkManagerCore,
}

impl BindingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_binding(
        &mut self,
        local_device: &DeviceLocal,
        remote_device: &DeviceRemote,
        server_address: &FeatureAddress,
        client_address: &FeatureAddress,
        server_feature_type: &str,
    ) -> (LinkOutcome, Option<LinkChangeEvent>) {
        self.core.add(
            local_device,
            remote_device,
            server_address,
            client_address,
            server_feature_type,
            true,
        )
    }

    pub fn remove_binding(
        &mut self,
        local_device: &DeviceLocal,
        remote_device: &DeviceRemote,
        server_address: &PartialFeatureAddress,
        client_address: &PartialFeatureAddress,
    ) -> (bool, Option<LinkChangeEvent>) {
        self.core
            .remove(local_device, remote_device, server_address, client_address)
    }

    pub fn remove_device_bindings(&mut self, device: &str) -> Vec<LinkChangeEvent> {
        self.core.remove_device(device)
    }

    pub fn remove_entity_bindings(&mut self, device: &str, entity: &[u32]) -> Vec<LinkChangeEvent> {
        self.core.remove_entity(device, entity)
    }

    pub fn create_binding_data(&self, remote_device: &str) -> Vec<LinkEntryWire> {
        self.core.wire_entries_for(remote_device)
    }
}
