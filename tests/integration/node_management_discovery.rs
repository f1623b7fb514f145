//! Scenario: a remote peer reads detailed discovery from the local device
//! through the full Sender/Dispatcher/NodeManagementHandler stack, and a
//! pushed discovery update is reflected in the remote tree (§4.5, §8
//! scenario 5 "Reply routing" applied to Node-Management).

use std::sync::Arc;

use parking_lot::Mutex;
use spine_dispatch::{Dispatcher, FeatureHandler, HandlerOutcome, Sender};
use spine_links::{BindingManager, SubscriptionManager};
use spine_nodemgmt::NodeManagementHandler;
use spine_protocol::{
    CmdClassifier, Command, Datagram, DeviceLocal, DeviceRemote, EntityAddress, EntityLocal, FeatureAddress,
    FeatureLocal, FeatureRole, FeatureType, FunctionData, Header, SPEC_VERSION,
};

fn local_device_with_one_feature() -> DeviceLocal {
    let mut device = DeviceLocal::new("local".to_owned());
    let mut entity = EntityLocal::new(
        EntityAddress {
            device: "local".to_owned(),
            entity: vec![1],
        },
        "EVSE",
    );
    entity.features.push(FeatureLocal::new(
        FeatureAddress {
            device: "local".to_owned(),
            entity: vec![1],
            feature: 1,
        },
        FeatureRole::Server,
        FeatureType::Measurement,
    ));
    device.entities.push(entity);
    device
}

fn read_datagram(counter: u64, dest: FeatureAddress, src: FeatureAddress) -> Datagram {
    Datagram {
        header: Header {
            spec_version: SPEC_VERSION.to_owned(),
            src_addr: src,
            dest_addr: dest,
            msg_counter: counter,
            msg_counter_ref: None,
            cmd_classifier: CmdClassifier::Read,
            ack_request: None,
        },
        commands: vec![Command::new(FunctionData::DetailedDiscoveryData(
            spine_protocol::DetailedDiscoveryData {
                entities: Vec::new(),
                features: Vec::new(),
            },
        ))],
    }
}

#[test]
fn remote_read_of_detailed_discovery_returns_the_local_tree() {
    let local = Arc::new(Mutex::new(local_device_with_one_feature()));
    let remote = Arc::new(Mutex::new(DeviceRemote::new("peer".to_owned())));
    let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
    let bindings = Arc::new(Mutex::new(BindingManager::new()));

    let handler = NodeManagementHandler::new(
        local.clone(),
        remote,
        subscriptions,
        bindings,
        "peer".to_owned(),
        "ShipId-local".to_owned(),
    );

    let mut dispatcher = Dispatcher::new(Sender::new("local".to_owned(), 0));
    dispatcher.register_handler(FeatureAddress::node_management("local".to_owned()), Box::new(handler));

    let request = read_datagram(
        1,
        FeatureAddress::node_management("local".to_owned()),
        FeatureAddress::node_management("peer".to_owned()),
    );
    let outgoing = dispatcher.on_datagram(request).unwrap();

    assert_eq!(outgoing.len(), 1);
    let reply = &outgoing[0];
    assert_eq!(reply.header.cmd_classifier, CmdClassifier::Reply);
    assert_eq!(reply.header.msg_counter_ref, Some(1));
    match &reply.commands[0].data {
        FunctionData::DetailedDiscoveryData(data) => {
            assert_eq!(data.entities.len(), 1);
            assert_eq!(data.entities[0].entity_type, "EVSE");
            assert_eq!(data.features.len(), 1);
            assert_eq!(data.features[0].feature_type, "Measurement");
        }
        other => panic!("expected DetailedDiscoveryData, got {other:?}"),
    }
}

#[test]
fn pushed_discovery_data_is_applied_to_the_remote_tree_without_a_reply() {
    let local = Arc::new(Mutex::new(DeviceLocal::new("local".to_owned())));
    let remote = Arc::new(Mutex::new(DeviceRemote::new("peer".to_owned())));
    let subscriptions = Arc::new(Mutex::new(SubscriptionManager::new()));
    let bindings = Arc::new(Mutex::new(BindingManager::new()));

    let mut handler = NodeManagementHandler::new(local, remote.clone(), subscriptions, bindings, "peer".to_owned(), "ShipId-local".to_owned());

    let header = Header {
        spec_version: SPEC_VERSION.to_owned(),
        src_addr: FeatureAddress::node_management("peer".to_owned()),
        dest_addr: FeatureAddress::node_management("local".to_owned()),
        msg_counter: 9,
        msg_counter_ref: None,
        cmd_classifier: CmdClassifier::Reply,
        ack_request: None,
    };
    let discovery = spine_protocol::DetailedDiscoveryData {
        entities: vec![spine_protocol::EntityInformation {
            description: EntityAddress {
                device: "peer".to_owned(),
                entity: vec![1],
            },
            entity_type: "EVSE".to_owned(),
        }],
        features: Vec::new(),
    };

    let outcome = handler.handle(&header, FunctionData::DetailedDiscoveryData(discovery));
    assert!(matches!(outcome, HandlerOutcome::NoReply));
    assert_eq!(remote.lock().entities.len(), 1);
    assert_eq!(handler.take_events().len(), 1);
}
