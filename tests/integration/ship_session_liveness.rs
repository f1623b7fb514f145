//! Scenario: two Sessions in complementary roles, driven end-to-end over a
//! real transport loop, both reach DATA within the HELLO timer and can then
//! carry a SPINE datagram across (§8 "Session liveness").

use std::time::Duration;

use eebus_test_support::{ChannelTransport, RecordingSink};
use serde_json::value::RawValue;
use ship_protocol::{DataMessage, ShipFrame};
use ship_session::{run_session, Role, Session, SessionConfig};
use tokio::sync::mpsc;

#[tokio::test]
async fn both_sessions_reach_data_and_exchange_a_datagram() {
    let (server_transport, client_transport) = ChannelTransport::pair();

    let server = Session::new(Role::Server, "ServerSKI".to_owned(), SessionConfig::default());
    let client = Session::new(Role::Client, "ClientSKI".to_owned(), SessionConfig::default());

    let (server_out_tx, server_out_rx) = mpsc::channel(4);
    let (client_out_tx, client_out_rx) = mpsc::channel(4);

    let server_sink = RecordingSink::new();
    let client_sink = RecordingSink::new();

    let server_sink_handle = server_sink.clone();
    let client_sink_handle = client_sink.clone();

    let server_task = tokio::spawn(run_session(server, server_transport, server_out_rx, server_sink_handle));
    let client_task = tokio::spawn(run_session(client, client_transport, client_out_rx, client_sink_handle));

    // `run_session` drives the whole handshake on its own; poll until both
    // sides have settled into DATA by repeatedly offering a datagram on the
    // client's outbound path (dropped pre-DATA) and checking the server's
    // sink for it.
    tokio::time::timeout(Duration::from_secs(2), async {
        let payload = RawValue::from_string(r#"{"hello":"world"}"#.to_owned()).unwrap();
        loop {
            let sent = client_out_tx
                .send(ShipFrame::Data(DataMessage::new(payload.clone())))
                .await;
            if sent.is_err() {
                break;
            }
            if !server_sink.received().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("sessions did not reach DATA within the HELLO timer");

    let received = server_sink.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].get(), r#"{"hello":"world"}"#);

    server_task.abort();
    client_task.abort();
}
