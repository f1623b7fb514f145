use tracing::debug;

use crate::container::LinkContainer;
use crate::events::LinkChangeEvent;
use crate::outcome::LinkOutcome;
use spine_protocol::{DeviceLocal, DeviceRemote, FeatureAddress, FeatureRole};

/// Whether a feature at `address` exists locally with the given role and
/// matches `feature_type` by its wire name.
fn local_feature_matches(
    device: &DeviceLocal,
    address: &FeatureAddress,
    role: FeatureRole,
    feature_type: &str,
) -> bool {
    device
        .feature(address)
        .is_some_and(|f| f.role == role && f.feature_type.wire_name() == feature_type)
}

fn remote_feature_matches(
    device: &DeviceRemote,
    address: &FeatureAddress,
    role: FeatureRole,
    feature_type: &str,
) -> bool {
    device
        .feature(address)
        .is_some_and(|f| f.role == role && f.feature_type.wire_name() == feature_type)
}

/// Shared core behind the Subscription and Binding Managers, which are
/// "structurally identical" per §4.4 apart from Binding's extra
/// at-most-one-per-server-feature rule.
pub struct LinkManagerCore {
    container: LinkContainer,
}

impl Default for LinkManagerCore {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkManagerCore {
    pub fn new() -> Self {
        LinkManagerCore {
            container: LinkContainer::new(),
        }
    }

    pub fn container(&self) -> &LinkContainer {
        &self.container
    }

    /// `enforce_unique_server` is Binding Manager's extra rule: a local
    /// server feature may have at most one remote binding, checked by
    /// scanning the container for the server address before insert.
    pub fn add(
        &mut self,
        local_device: &DeviceLocal,
        remote_device: &DeviceRemote,
        server_address: &FeatureAddress,
        client_address: &FeatureAddress,
        required_feature_type: &str,
        enforce_unique_server: bool,
    ) -> (LinkOutcome, Option<LinkChangeEvent>) {
        if !local_feature_matches(
            local_device,
            server_address,
            FeatureRole::Server,
            required_feature_type,
        ) {
            return (LinkOutcome::NoChange, None);
        }
        if !remote_feature_matches(
            remote_device,
            client_address,
            FeatureRole::Client,
            required_feature_type,
        ) {
            return (LinkOutcome::NoChange, None);
        }
        if self.container.find(server_address, client_address).is_some() {
            return (LinkOutcome::NoChange, None);
        }
        if enforce_unique_server && self.container.find_by_server(server_address).is_some() {
            debug!(?server_address, "server feature already has a binding, rejecting second one");
            return (LinkOutcome::NoChange, None);
        }

        let id = self
            .container
            .insert(server_address.clone(), client_address.clone());
        let event = LinkChangeEvent::Added {
            id,
            server_address: server_address.clone(),
            client_address: client_address.clone(),
        };
        (LinkOutcome::Added(id), Some(event))
    }

    /// §4.4's defaulting rules: an absent `client_address.device` is the
    /// remote's device address; an absent `server_address.device` is the
    /// local device address.
    pub fn remove(
        &mut self,
        local_device: &DeviceLocal,
        remote_device: &DeviceRemote,
        server_address: &spine_protocol::PartialFeatureAddress,
        client_address: &spine_protocol::PartialFeatureAddress,
    ) -> (bool, Option<LinkChangeEvent>) {
        let client_full = FeatureAddress {
            device: client_address
                .device
                .clone()
                .unwrap_or_else(|| remote_device.address.clone()),
            entity: client_address.entity.clone(),
            feature: client_address.feature,
        };
        let server_full = FeatureAddress {
            device: server_address
                .device
                .clone()
                .unwrap_or_else(|| local_device.address.clone()),
            entity: server_address.entity.clone(),
            feature: server_address.feature,
        };

        if local_device.feature(&server_full).is_none() {
            return (false, None);
        }

        let Some(link) = self.container.find(&server_full, &client_full) else {
            return (false, None);
        };
        let id = link.id;
        self.container.remove(&server_full, &client_full);
        let event = LinkChangeEvent::Removed {
            id,
            server_address: server_full,
            client_address: client_full,
        };
        (true, Some(event))
    }

    pub fn remove_device(&mut self, device: &str) -> Vec<LinkChangeEvent> {
        self.container
            .remove_client_device(device)
            .into_iter()
            .map(|l| LinkChangeEvent::Removed {
                id: l.id,
                server_address: l.server_address,
                client_address: l.client_address,
            })
            .collect()
    }

    pub fn remove_entity(&mut self, device: &str, entity: &[u32]) -> Vec<LinkChangeEvent> {
        self.container
            .remove_client_entity(device, entity)
            .into_iter()
            .map(|l| LinkChangeEvent::Removed {
                id: l.id,
                server_address: l.server_address,
                client_address: l.client_address,
            })
            .collect()
    }

    pub fn wire_entries_for(&self, remote_device: &str) -> Vec<spine_protocol::LinkEntryWire> {
        self.container
            .for_client_device(remote_device)
            .into_iter()
            .map(|l| spine_protocol::LinkEntryWire {
                id: l.id,
                server_address: l.server_address.clone(),
                client_address: l.client_address.clone(),
            })
            .collect()
    }

    pub fn matches_for_publish(&self, server_address: &FeatureAddress) -> Vec<&crate::container::Link> {
        self.container
            .iter()
            .filter(|l| &l.server_address == server_address)
            .collect()
    }
}
