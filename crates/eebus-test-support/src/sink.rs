use std::sync::{Arc, Mutex};

use serde_json::value::RawValue;
use ship_session::DatagramSink;

/// Collects every datagram payload handed to it, for assertions in
/// integration tests driving a real `run_session` loop.
#[derive(Clone, Default)]
pub struct RecordingSink {
    received: Arc<Mutex<Vec<Box<RawValue>>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Box<RawValue>> {
        self.received.lock().expect("not poisoned").clone()
    }
}

impl DatagramSink for RecordingSink {
    fn on_datagram(&mut self, payload: Box<RawValue>) {
        self.received.lock().expect("not poisoned").push(payload);
    }
}
