use ship_protocol::ProtocolVersion;
use std::time::Duration;

/// Tunables for a single Session, surfaced as configurable fields with
/// sensible defaults rather than scattering literals through the state
/// machine, matching the forwarder's `config.rs` pattern of named
/// constants with documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// HELLO_SENT timer: aborts the handshake if no `ready`/`pending` is
    /// seen in time.
    pub hello_timeout: Duration,
    /// CLOSING timer: aborts unilaterally if the peer never confirms.
    pub closing_timeout: Duration,
    /// Default deadline for an outstanding read/write/call request.
    pub max_response_delay: Duration,
    /// Highest protocol version this side implements.
    pub local_max_version: ProtocolVersion,
    /// Formats this side can decode, most-preferred first.
    pub local_formats: Vec<ship_protocol::MessageFormat>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            hello_timeout: Duration::from_secs(10),
            closing_timeout: Duration::from_secs(3),
            max_response_delay: Duration::from_secs(10),
            local_max_version: ProtocolVersion { major: 1, minor: 0 },
            local_formats: vec![ship_protocol::MessageFormat::JsonUtf8],
        }
    }
}
