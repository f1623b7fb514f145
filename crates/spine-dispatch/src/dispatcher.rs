use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use spine_protocol::{CmdClassifier, Datagram, EebusError, FeatureAddress, FunctionData, Header};

use crate::error::DispatchError;
use crate::handler::{FeatureHandler, HandlerOutcome};
use crate::sender::Sender;

type PendingResult = Result<FunctionData, EebusError>;

struct Outstanding {
    reply_to: oneshot::Sender<PendingResult>,
    deadline: Instant,
}

/// Routes inbound datagrams to the addressed feature's handler, and
/// correlates inbound `reply`/`result` datagrams back to the outstanding
/// request that caused them (§4.3).
///
/// One Dispatcher per Session: it only ever sees the traffic of the peer
/// its Session is talking to.
pub struct Dispatcher {
    sender: Sender,
    handlers: HashMap<FeatureAddress, Box<dyn FeatureHandler + Send>>,
    outstanding: HashMap<u64, Outstanding>,
}

impl Dispatcher {
    pub fn new(sender: Sender) -> Self {
        Dispatcher {
            sender,
            handlers: HashMap::new(),
            outstanding: HashMap::new(),
        }
    }

    pub fn sender_mut(&mut self) -> &mut Sender {
        &mut self.sender
    }

    pub fn register_handler(&mut self, address: FeatureAddress, handler: Box<dyn FeatureHandler + Send>) {
        self.handlers.insert(address, handler);
    }

    /// Registers a request's `msg_counter` as outstanding and returns the
    /// receiving half of the channel its eventual `reply`/`result` will be
    /// delivered on.
    pub fn await_reply(&mut self, msg_counter: u64, timeout: Duration) -> oneshot::Receiver<PendingResult> {
        let (tx, rx) = oneshot::channel();
        self.outstanding.insert(
            msg_counter,
            Outstanding {
                reply_to: tx,
                deadline: Instant::now() + timeout,
            },
        );
        rx
    }

    /// Drains outstanding requests whose deadline has passed, completing
    /// each with `EebusError::Timeout`. Call this on a periodic tick; the
    /// Session owns the single wall-clock timer that drives it (§5).
    pub fn expire_overdue(&mut self) {
        let now = Instant::now();
        let expired: Vec<u64> = self
            .outstanding
            .iter()
            .filter(|(_, o)| o.deadline <= now)
            .map(|(counter, _)| *counter)
            .collect();
        for counter in expired {
            if let Some(entry) = self.outstanding.remove(&counter) {
                let _ = entry.reply_to.send(Err(EebusError::Timeout));
            }
        }
    }

    /// Implements the dispatch algorithm: correlate replies/results to an
    /// outstanding request if one matches, otherwise hand the command to
    /// the addressed feature's handler and turn its outcome into zero or
    /// more outbound datagrams.
    pub fn on_datagram(&mut self, datagram: Datagram) -> Result<Vec<Datagram>, DispatchError> {
        let header = datagram.header.clone();

        if matches!(header.cmd_classifier, CmdClassifier::Reply | CmdClassifier::Result) {
            if let Some(counter_ref) = header.msg_counter_ref {
                if let Some(entry) = self.outstanding.remove(&counter_ref) {
                    let outcome = datagram
                        .commands
                        .into_iter()
                        .next()
                        .map(|c| c.data)
                        .ok_or_else(|| EebusError::Parse("empty reply payload".to_owned()));
                    let outcome = match (header.cmd_classifier, outcome) {
                        (CmdClassifier::Result, Ok(FunctionData::ResultData(result)))
                            if result.error_number != 0 =>
                        {
                            Err(EebusError::Communication)
                        }
                        (_, other) => other,
                    };
                    let _ = entry.reply_to.send(outcome);
                    return Ok(Vec::new());
                }
                debug!(counter_ref, "reply/result with no matching outstanding request");
                return Ok(Vec::new());
            }
        }

        let Some(handler) = self.handlers.get_mut(&header.dest_addr) else {
            warn!(dest = ?header.dest_addr, "no handler registered for destination feature");
            // §4.3 step 1: a missing destination gets a result_error back
            // toward the sender for any classifier other than `result`
            // itself — not only when the sender asked for an ack.
            if header.cmd_classifier == CmdClassifier::Result {
                return Err(DispatchError::NoDestination);
            }
            let datagram = self.sender.result_error(&header, header.dest_addr.clone(), &EebusError::NotAvailable);
            return Ok(vec![datagram]);
        };

        let data = datagram
            .commands
            .into_iter()
            .next()
            .map(|c| c.data)
            .unwrap_or(FunctionData::Other {
                key: "opaque".to_owned(),
                value: serde_json::Value::Null,
            });

        let outcome = handler.handle(&header, data);
        Ok(self.outgoing_for(&header, outcome))
    }

    fn outgoing_for(&mut self, header: &Header, outcome: HandlerOutcome) -> Vec<Datagram> {
        let src = header.dest_addr.clone();
        match (header.cmd_classifier, outcome) {
            (CmdClassifier::Read, HandlerOutcome::Reply(data)) => {
                vec![self.sender.reply(header, src, data)]
            }
            (CmdClassifier::Read, HandlerOutcome::Error(err)) => {
                vec![self.sender.result_error(header, src, &err)]
            }
            (CmdClassifier::Write | CmdClassifier::Call, HandlerOutcome::Reply(data)) => {
                vec![self.sender.reply(header, src.clone(), data), self.sender.result_success(header, src)]
            }
            (CmdClassifier::Write | CmdClassifier::Call, HandlerOutcome::Error(err)) => {
                vec![self.sender.result_error(header, src, &err)]
            }
            (CmdClassifier::Write | CmdClassifier::Call, HandlerOutcome::NoReply)
                if header.ack_request == Some(true) =>
            {
                vec![self.sender.result_success(header, src)]
            }
            (_, HandlerOutcome::NoReply) => Vec::new(),
            (CmdClassifier::Notify, HandlerOutcome::Error(err)) => {
                vec![self.sender.result_error(header, src, &err)]
            }
            (_, HandlerOutcome::Reply(_)) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spine_protocol::SPEC_VERSION;

    fn addr(feature: u32) -> FeatureAddress {
        FeatureAddress {
            device: "dev-1".to_owned(),
            entity: vec![0],
            feature,
        }
    }

    struct EchoHandler;
    impl FeatureHandler for EchoHandler {
        fn handle(&mut self, _header: &Header, data: FunctionData) -> HandlerOutcome {
            HandlerOutcome::Reply(data)
        }
    }

    fn request(classifier: CmdClassifier, counter: u64, ack: Option<bool>) -> Datagram {
        Datagram {
            header: Header {
                spec_version: SPEC_VERSION.to_owned(),
                src_addr: addr(1),
                dest_addr: addr(0),
                msg_counter: counter,
                msg_counter_ref: None,
                cmd_classifier: classifier,
                ack_request: ack,
            },
            commands: vec![spine_protocol::Command::new(FunctionData::Other {
                key: "opaque".to_owned(),
                value: serde_json::json!({"x": 1}),
            })],
        }
    }

    #[test]
    fn read_dispatches_to_handler_and_replies() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        dispatcher.register_handler(addr(0), Box::new(EchoHandler));
        let out = dispatcher.on_datagram(request(CmdClassifier::Read, 1, None)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].header.cmd_classifier, CmdClassifier::Reply);
        assert_eq!(out[0].header.msg_counter_ref, Some(1));
    }

    #[test]
    fn missing_destination_without_ack_still_sends_result_error() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        let out = dispatcher.on_datagram(request(CmdClassifier::Read, 1, None)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].header.cmd_classifier, CmdClassifier::Result);
    }

    #[test]
    fn missing_destination_on_a_result_datagram_is_an_error_not_another_result() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        let result = dispatcher.on_datagram(request(CmdClassifier::Result, 1, None));
        assert!(matches!(result, Err(DispatchError::NoDestination)));
    }

    #[test]
    fn missing_destination_with_ack_sends_result_error() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        let out = dispatcher
            .on_datagram(request(CmdClassifier::Write, 1, Some(true)))
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].header.cmd_classifier, CmdClassifier::Result);
    }

    #[tokio::test]
    async fn reply_completes_the_matching_outstanding_request() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        let rx = dispatcher.await_reply(5, Duration::from_secs(1));

        let reply = Datagram {
            header: Header {
                spec_version: SPEC_VERSION.to_owned(),
                src_addr: addr(0),
                dest_addr: addr(1),
                msg_counter: 99,
                msg_counter_ref: Some(5),
                cmd_classifier: CmdClassifier::Reply,
                ack_request: None,
            },
            commands: vec![spine_protocol::Command::new(FunctionData::Other {
                key: "opaque".to_owned(),
                value: serde_json::json!({"ok": true}),
            })],
        };
        let out = dispatcher.on_datagram(reply).unwrap();
        assert!(out.is_empty());

        let result = rx.await.unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn expire_overdue_completes_outstanding_with_timeout() {
        let mut dispatcher = Dispatcher::new(Sender::new("dev-1".to_owned(), 0));
        let rx = dispatcher.await_reply(1, Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        dispatcher.expire_overdue();
        let result = rx.blocking_recv().unwrap();
        assert!(matches!(result, Err(EebusError::Timeout)));
    }
}
