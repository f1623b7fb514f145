/// One discoverable EEBUS service, as handed to the Node by its mDNS
/// collaborator (§4.6, §6). `host`/`port`/`path` are the raw record
/// fields; the core assembles the connect URI from them rather than
/// trusting a pre-built one from the browse transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdnsEntry {
    pub ski: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl MdnsEntry {
    /// `wss://{host-no-trailing-dot}:{port}{path}` (§6). mDNS hostnames are
    /// FQDNs and carry a trailing dot that the URI form drops.
    pub fn connect_uri(&self) -> String {
        format!("wss://{}:{}{}", self.host.trim_end_matches('.'), self.port, self.path)
    }
}

/// Abstracts the mDNS browser so the Node's control-loop logic can be
/// exercised without a real network (mirrors the Connector split below:
/// discovery is injected, not owned).
pub trait MdnsCollaborator: Send {
    /// Registers `on_entries` to be invoked with a full snapshot every time
    /// the visible-services set changes.
    fn watch(&mut self, on_entries: Box<dyn Fn(Vec<MdnsEntry>) + Send>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_uri_strips_the_mdns_host_trailing_dot() {
        let entry = MdnsEntry {
            ski: "ski-1".to_owned(),
            host: "peer.local.".to_owned(),
            port: 4712,
            path: "/ship/".to_owned(),
        };
        assert_eq!(entry.connect_uri(), "wss://peer.local:4712/ship/");
    }

    #[test]
    fn connect_uri_is_unchanged_without_a_trailing_dot() {
        let entry = MdnsEntry {
            ski: "ski-1".to_owned(),
            host: "192.168.1.5".to_owned(),
            port: 4712,
            path: "/ship/".to_owned(),
        };
        assert_eq!(entry.connect_uri(), "wss://192.168.1.5:4712/ship/");
    }
}
