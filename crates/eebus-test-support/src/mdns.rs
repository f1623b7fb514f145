use std::sync::{Arc, Mutex};

use eebus_node::{MdnsCollaborator, MdnsEntry};

/// A mDNS collaborator a test can trigger by hand instead of waiting on
/// real network discovery.
#[derive(Clone, Default)]
pub struct FakeMdns {
    callback: Arc<Mutex<Option<Box<dyn Fn(Vec<MdnsEntry>) + Send>>>>,
}

impl FakeMdns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a browse tick delivering `entries`. Panics if `watch` was
    /// never called, matching the contract that a Node always installs its
    /// callback before starting discovery.
    pub fn announce(&self, entries: Vec<MdnsEntry>) {
        let guard = self.callback.lock().expect("not poisoned");
        let callback = guard.as_ref().expect("watch() must be called before announce()");
        callback(entries);
    }
}

impl MdnsCollaborator for FakeMdns {
    fn watch(&mut self, on_entries: Box<dyn Fn(Vec<MdnsEntry>) + Send>) {
        *self.callback.lock().expect("not poisoned") = Some(on_entries);
    }
}
