//! Scenario: an outbound `read` registers a callback keyed by its counter;
//! the matching reply invokes it exactly once, and delivering anything
//! else with that same counter-ref afterwards has no further effect (§8
//! "Reply correlation").

use std::time::Duration;

use spine_dispatch::{Dispatcher, Sender};
use spine_protocol::{CmdClassifier, Command, Datagram, FeatureAddress, FunctionData, Header, SPEC_VERSION};

fn addr(feature: u32) -> FeatureAddress {
    FeatureAddress {
        device: "dev-1".to_owned(),
        entity: vec![0],
        feature,
    }
}

fn unsolicited_reply(counter: u64, counter_ref: u64) -> Datagram {
    Datagram {
        header: Header {
            spec_version: SPEC_VERSION.to_owned(),
            src_addr: addr(1),
            dest_addr: addr(0),
            msg_counter: counter,
            msg_counter_ref: Some(counter_ref),
            cmd_classifier: CmdClassifier::Reply,
            ack_request: None,
        },
        commands: vec![Command::new(FunctionData::Other {
            key: "opaque".to_owned(),
            value: serde_json::json!({"v": counter}),
        })],
    }
}

#[tokio::test]
async fn matching_reply_completes_the_callback_exactly_once() {
    let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
    let outbound = dispatcher
        .sender_mut()
        .read(addr(1), addr(0), FunctionData::Other {
            key: "opaque".to_owned(),
            value: serde_json::json!({"q": 1}),
        });
    let counter = outbound.header.msg_counter;

    let rx = dispatcher.await_reply(counter, Duration::from_secs(1));

    // First reply with this counter-ref completes the pending callback and
    // produces no routed datagram.
    let first = dispatcher.on_datagram(unsolicited_reply(100, counter)).unwrap();
    assert!(first.is_empty());
    let completed = rx.await.unwrap();
    assert!(completed.is_ok());

    // A second reply with the same counter-ref has nothing left to
    // correlate against and is dropped rather than re-delivered.
    let second = dispatcher.on_datagram(unsolicited_reply(101, counter)).unwrap();
    assert!(second.is_empty());
}

#[test]
fn a_reply_with_no_outstanding_request_and_no_handler_is_dropped_silently() {
    let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
    let out = dispatcher.on_datagram(unsolicited_reply(5, 999)).unwrap();
    assert!(out.is_empty());
}
