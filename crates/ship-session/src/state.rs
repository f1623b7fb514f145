use ship_protocol::{HandshakeType, MessageFormat, ProtocolVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Init,
    HelloSent,
    Handshake,
    Pin,
    Access,
    Data,
    Closing,
    Aborted,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Init => "INIT",
            SessionState::HelloSent => "HELLO_SENT",
            SessionState::Handshake => "HANDSHAKE",
            SessionState::Pin => "PIN",
            SessionState::Access => "ACCESS",
            SessionState::Data => "DATA",
            SessionState::Closing => "CLOSING",
            SessionState::Aborted => "ABORTED",
        }
    }
}

/// Negotiate the handshake per §4.2: accepted version is `min(local_max,
/// peer_max)` component-wise on major/minor (both sides fixed at major 1
/// in practice, but the rule is expressed generally); accepted format is
/// the first the client announced that the server also supports.
pub fn negotiate(
    local_max: ProtocolVersion,
    local_formats: &[MessageFormat],
    peer_max: ProtocolVersion,
    peer_formats: &[MessageFormat],
) -> Option<(ProtocolVersion, MessageFormat)> {
    let version = ProtocolVersion {
        major: local_max.major.min(peer_max.major),
        minor: local_max.minor.min(peer_max.minor),
    };
    let format = peer_formats
        .iter()
        .find(|f| local_formats.contains(f))
        .copied()?;
    Some((version, format))
}

pub const HANDSHAKE_ANNOUNCE: HandshakeType = HandshakeType::AnnounceMax;
pub const HANDSHAKE_SELECT: HandshakeType = HandshakeType::Select;
