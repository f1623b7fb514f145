//! Scenario: across a sequence of add/remove calls, the Subscription
//! Manager never holds two entries for the same (server, client) pair, ids
//! are strictly increasing, and removing a device's subscriptions leaves no
//! entry referencing that device's features (§8 "Subscription invariants").

use spine_links::{LinkOutcome, SubscriptionManager};
use spine_protocol::{
    DeviceLocal, DeviceRemote, EntityAddress, EntityLocal, EntityRemote, FeatureAddress, FeatureLocal, FeatureRemote,
    FeatureRole, FeatureType,
};

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
        EntityAddress {
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
        EntityAddress {
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
    rentity.features.push(FeatureRemote::new(
        addr("remote", 3),
        FeatureRole::Client,
        FeatureType::Measurement,
    ));
    remote.entities.push(rentity);

    (local, remote)
}

#[test]
fn duplicate_adds_never_produce_two_entries_for_the_same_pair() {
    let (local, remote) = fixture();
    let mut mgr = SubscriptionManager::new();
    let server = addr("local", 1);
    let client = addr("remote", 2);

    for _ in 0..5 {
        mgr.add_subscription(&local, &remote, &server, &client, "Measurement");
    }
    assert_eq!(mgr.create_subscription_data("remote").len(), 1);
}

#[test]
fn ids_are_strictly_increasing_across_distinct_subscriptions() {
    let (local, remote) = fixture();
    let mut mgr = SubscriptionManager::new();

    let (first, _) = mgr.add_subscription(&local, &remote, &addr("local", 1), &addr("remote", 2), "Measurement");
    let (second, _) = mgr.add_subscription(&local, &remote, &addr("local", 1), &addr("remote", 3), "Measurement");

    let LinkOutcome::Added(first_id) = first else {
        panic!("first subscription should have been added")
    };
    let LinkOutcome::Added(second_id) = second else {
        panic!("second subscription should have been added")
    };
    assert!(second_id > first_id);
}

#[test]
fn removing_a_devices_subscriptions_clears_every_entry_referencing_it() {
    let (local, remote) = fixture();
    let mut mgr = SubscriptionManager::new();

    mgr.add_subscription(&local, &remote, &addr("local", 1), &addr("remote", 2), "Measurement");
    mgr.add_subscription(&local, &remote, &addr("local", 1), &addr("remote", 3), "Measurement");
    assert_eq!(mgr.create_subscription_data("remote").len(), 2);

    let removed = mgr.remove_device_subscriptions("remote");
    assert_eq!(removed.len(), 2);
    assert!(mgr.create_subscription_data("remote").is_empty());
}
