use crate::container::Link;
use crate::events::LinkChangeEvent;
use crate::manager::LinkManagerCore;
use crate::outcome::LinkOutcome;
use spine_dispatch::Sender;
use spine_protocol::{
    Datagram, DeviceLocal, DeviceRemote, FeatureAddress, FunctionData, LinkEntryWire, PartialFeatureAddress,
};

/// Holds one LinkContainer of subscription entries (§4.4). An entry means
/// "the client feature observes the server feature" — `publish` notifies
/// every client whose subscription matches a given local server address.
#[derive(Default)]
pub struct SubscriptionManager {
    core: LinkManagerCore,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscription(
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
            false,
        )
    }

    pub fn remove_subscription(
        &mut self,
        local_device: &DeviceLocal,
        remote_device: &DeviceRemote,
        server_address: &PartialFeatureAddress,
        client_address: &PartialFeatureAddress,
    ) -> (bool, Option<LinkChangeEvent>) {
        self.core
            .remove(local_device, remote_device, server_address, client_address)
    }

    pub fn remove_device_subscriptions(&mut self, device: &str) -> Vec<LinkChangeEvent> {
        self.core.remove_device(device)
    }

    pub fn remove_entity_subscriptions(&mut self, device: &str, entity: &[u32]) -> Vec<LinkChangeEvent> {
        self.core.remove_entity(device, entity)
    }

    /// Entries whose server matches `server_address` — `publish` below
    /// drives `Sender::notify` for each; exposed directly too since some
    /// callers (e.g. node-management's own change events) want the raw
    /// match list without sending anything.
    pub fn matches_for_publish(&self, server_address: &FeatureAddress) -> Vec<&Link> {
        self.core.matches_for_publish(server_address)
    }

    /// §4.4 `publish`: local data behind `server_address` changed, so
    /// notify every client feature currently subscribed to it. `sender` is
    /// this manager's own peer's Sender — one SubscriptionManager is
    /// scoped to a single remote device's traffic, same as the Dispatcher
    /// it rides alongside.
    pub fn publish(&self, sender: &mut Sender, server_address: &FeatureAddress, data: FunctionData) -> Vec<Datagram> {
        self.matches_for_publish(server_address)
            .into_iter()
            .map(|link| sender.notify(link.server_address.clone(), link.client_address.clone(), data.clone()))
            .collect()
    }

    pub fn create_subscription_data(&self, remote_device: &str) -> Vec<LinkEntryWire> {
        self.core.wire_entries_for(remote_device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spine_protocol::{DeviceLocal, DeviceRemote, EntityLocal, EntityRemote, FeatureLocal, FeatureRemote, FeatureRole, FeatureType};

    fn addr(device: &str, feature: u32) -> FeatureAddress {
        FeatureAddress {
            device: device.to_owned(),
            entity: vec![1],
            feature,
        }
    }

    fn fixture() -> (DeviceLocal, DeviceRemote) {
        let mut local = DeviceLocal::new("local".to_owned());
        let mut entity = EntityLocal::new(
            spine_protocol::EntityAddress {
                device: "local".to_owned(),
                entity: vec![1],
            },
            "Generic",
        );
        entity.features.push(FeatureLocal::new(
            addr("local", 1),
            FeatureRole::Server,
            FeatureType::Measurement,
        ));
        local.entities.push(entity);

        let mut remote = DeviceRemote::new("remote".to_owned());
        let mut rentity = EntityRemote::new(
            spine_protocol::EntityAddress {
                device: "remote".to_owned(),
                entity: vec![1],
            },
            "Generic",
        );
        rentity.features.push(FeatureRemote::new(
            addr("remote", 2),
            FeatureRole::Client,
            FeatureType::Measurement,
        ));
        remote.entities.push(rentity);

        (local, remote)
    }

    #[test]
    fn duplicate_add_subscription_returns_ok_then_no_change() {
        let (local, remote) = fixture();
        let mut mgr = SubscriptionManager::new();
        let server = addr("local", 1);
        let client = addr("remote", 2);

        let (first, event) = mgr.add_subscription(&local, &remote, &server, &client, "Measurement");
        assert!(first.is_added());
        assert!(event.is_some());

        let (second, event2) = mgr.add_subscription(&local, &remote, &server, &client, "Measurement");
        assert_eq!(second, LinkOutcome::NoChange);
        assert!(event2.is_none());

        assert_eq!(mgr.create_subscription_data("remote").len(), 1);
    }

    #[test]
    fn add_subscription_rejects_mismatched_feature_type() {
        let (local, remote) = fixture();
        let mut mgr = SubscriptionManager::new();
        let (outcome, _) = mgr.add_subscription(
            &local,
            &remote,
            &addr("local", 1),
            &addr("remote", 2),
            "Alarm",
        );
        assert_eq!(outcome, LinkOutcome::NoChange);
    }

    #[test]
    fn remove_subscription_defaults_missing_device_parts() {
        let (local, remote) = fixture();
        let mut mgr = SubscriptionManager::new();
        mgr.add_subscription(&local, &remote, &addr("local", 1), &addr("remote", 2), "Measurement");

        let partial_client = PartialFeatureAddress {
            device: None,
            entity: vec![1],
            feature: 2,
        };
        let partial_server = PartialFeatureAddress {
            device: None,
            entity: vec![1],
            feature: 1,
        };
        let (removed, event) = mgr.remove_subscription(&local, &remote, &partial_server, &partial_client);
        assert!(removed);
        assert!(matches!(event, Some(LinkChangeEvent::Removed { .. })));
        assert!(mgr.create_subscription_data("remote").is_empty());
    }

    #[test]
    fn publish_notifies_every_subscribed_client_and_keeps_the_real_wire_key() {
        let (local, remote) = fixture();
        let mut mgr = SubscriptionManager::new();
        let server = addr("local", 1);
        let client = addr("remote", 2);
        mgr.add_subscription(&local, &remote, &server, &client, "Measurement");

        let mut sender = Sender::new("local".to_owned(), 0);
        let data = FunctionData::Other {
            key: "measurementListData".to_owned(),
            value: serde_json::json!({"measurement": []}),
        };
        let datagrams = mgr.publish(&mut sender, &server, data);

        assert_eq!(datagrams.len(), 1);
        assert_eq!(datagrams[0].header.cmd_classifier, spine_protocol::CmdClassifier::Notify);
        assert_eq!(datagrams[0].header.src_addr, server);
        assert_eq!(datagrams[0].header.dest_addr, client);
        assert!(matches!(
            &datagrams[0].commands[0].data,
            FunctionData::Other { key, .. } if key == "measurementListData"
        ));
    }

    #[test]
    fn publish_with_no_subscribers_sends_nothing() {
        let mut mgr = SubscriptionManager::new();
        let mut sender = Sender::new("local".to_owned(), 0);
        let datagrams = mgr.publish(
            &mut sender,
            &addr("local", 1),
            FunctionData::Other { key: "opaque".to_owned(), value: serde_json::json!({}) },
        );
        assert!(datagrams.is_empty());
    }
}
