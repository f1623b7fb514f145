use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::state::{negotiate, Role, SessionState};
use ship_protocol::{
    AccessMethods, ClosePhase, ConnectionClose, ConnectionHello, ConnectionPinState, DataMessage,
    HandshakeError, HandshakeType, HelloPhase, MessageProtocolHandshake,
    MessageProtocolHandshakeError, PinInputPermission, PinState, ShipFrame,
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Inputs the state machine reacts to. Transport I/O and the timer itself
/// are owned by the caller (see `run_session` in `transport.rs`); this type
/// only carries what actually happened.
#[derive(Debug)]
pub enum Event {
    Open,
    Frame(ShipFrame),
    TimerExpired,
    LocalClose,
}

/// What the state machine wants done in response to an `Event`: zero or
/// more frames to send, and whether (and for how long) the single timer
/// should be (re)armed.
#[derive(Debug, Default)]
pub struct Actions {
    pub send: Vec<ShipFrame>,
    pub rearm_timer: Option<std::time::Duration>,
    pub deliver_data: Vec<Box<serde_json::value::RawValue>>,
}

impl Actions {
    fn send_one(frame: ShipFrame) -> Self {
        Actions {
            send: vec![frame],
            ..Default::default()
        }
    }
}

/// A single SHIP session's state machine. Pure and synchronous: the async
/// transport loop (`transport.rs`) feeds it events and executes the
/// actions it returns, so the transition logic itself needs no runtime to
/// exercise in tests.
pub struct Session {
    pub id: Uuid,
    pub role: Role,
    pub config: SessionConfig,
    pub state: SessionState,
    negotiated_format: Option<ship_protocol::MessageFormat>,
    peer_ship_id: Option<String>,
    local_ship_id: String,
}

impl Session {
    pub fn new(role: Role, local_ship_id: String, config: SessionConfig) -> Self {
        Session {
            id: Uuid::new_v4(),
            role,
            config,
            state: SessionState::Init,
            negotiated_format: None,
            peer_ship_id: None,
            local_ship_id,
        }
    }

    fn violation(&self, detail: impl Into<String>) -> SessionError {
        SessionError::ProtocolViolation {
            state: self.state.name(),
            detail: detail.into(),
        }
    }

    fn abort(&mut self) -> Actions {
        self.state = SessionState::Aborted;
        Actions::default()
    }

    pub fn on_event(&mut self, event: Event) -> Result<Actions, SessionError> {
        match event {
            Event::Open => self.on_open(),
            Event::Frame(frame) => self.on_frame(frame),
            Event::TimerExpired => self.on_timer(),
            Event::LocalClose => self.on_local_close(),
        }
    }

    fn on_open(&mut self) -> Result<Actions, SessionError> {
        if self.state != SessionState::Init {
            return Err(self.violation("Open event outside INIT"));
        }
        self.state = SessionState::HelloSent;
        Ok(Actions {
            send: vec![ShipFrame::Init],
            rearm_timer: Some(self.config.hello_timeout),
            ..Default::default()
        })
    }

    fn on_timer(&mut self) -> Result<Actions, SessionError> {
        match self.state {
            SessionState::HelloSent => {
                debug!(session = %self.id, "hello timer expired, aborting");
                let abort_frame = ShipFrame::Control(ship_protocol::ControlMessage::ConnectionHello(
                    ConnectionHello {
                        phase: HelloPhase::Aborted,
                        waiting: None,
                        prolongation_request: None,
                    },
                ));
                self.state = SessionState::Aborted;
                Ok(Actions::send_one(abort_frame))
            }
            SessionState::Closing => {
                debug!(session = %self.id, "closing timer expired, aborting unilaterally");
                Ok(self.abort())
            }
            _ => Ok(Actions::default()),
        }
    }

    fn on_local_close(&mut self) -> Result<Actions, SessionError> {
        if self.state != SessionState::Data {
            return Err(self.violation("local close outside DATA"));
        }
        self.state = SessionState::Closing;
        Ok(Actions {
            send: vec![ShipFrame::End(ConnectionClose {
                phase: ClosePhase::Announce,
                max_time: None,
                reason: None,
            })],
            rearm_timer: Some(self.config.closing_timeout),
            ..Default::default()
        })
    }

    fn on_frame(&mut self, frame: ShipFrame) -> Result<Actions, SessionError> {
        use ship_protocol::ControlMessage as C;

        match (&self.state, &frame) {
            (SessionState::HelloSent, ShipFrame::Control(C::ConnectionHello(hello))) => {
                self.on_hello(hello.clone())
            }
            (SessionState::Handshake, ShipFrame::Control(C::MessageProtocolHandshake(hs))) => {
                self.on_handshake(hs.clone())
            }
            (SessionState::Pin, ShipFrame::Control(C::ConnectionPinState(pin))) => {
                self.on_pin_state(*pin)
            }
            (SessionState::Access, ShipFrame::Control(C::AccessMethodsRequest)) => {
                self.on_access_request()
            }
            (SessionState::Access, ShipFrame::Control(C::AccessMethods(methods))) => {
                self.on_access_methods(methods.clone())
            }
            (SessionState::Data, ShipFrame::Data(data)) => self.on_data(data),
            (SessionState::Data, ShipFrame::End(close)) if close.phase == ClosePhase::Announce => {
                self.state = SessionState::Aborted;
                Ok(Actions::send_one(ShipFrame::End(ConnectionClose {
                    phase: ClosePhase::Confirm,
                    max_time: None,
                    reason: None,
                })))
            }
            (SessionState::Closing, ShipFrame::End(close)) if close.phase == ClosePhase::Confirm => {
                Ok(self.abort())
            }
            (SessionState::HelloSent, ShipFrame::Init) => {
                // The peer's ping is the cue to start the hello exchange:
                // send our own connectionHello(ready) and wait for theirs.
                Ok(Actions::send_one(ShipFrame::Control(
                    ship_protocol::ControlMessage::ConnectionHello(ConnectionHello {
                        phase: HelloPhase::Ready,
                        waiting: None,
                        prolongation_request: None,
                    }),
                )))
            }
            (_, ShipFrame::Init) => Ok(Actions::default()),
            _ => {
                warn!(session = %self.id, state = self.state.name(), "protocol violation, aborting");
                Ok(self.abort())
            }
        }
    }

    fn on_hello(&mut self, hello: ConnectionHello) -> Result<Actions, SessionError> {
        match hello.phase {
            HelloPhase::Pending => Ok(Actions {
                rearm_timer: Some(self.config.hello_timeout),
                ..Default::default()
            }),
            HelloPhase::Aborted => Ok(self.abort()),
            HelloPhase::Ready => {
                self.state = SessionState::Handshake;
                // Our own connectionHello(ready) was already sent in
                // response to the peer's INIT ping (see `on_frame`'s
                // `HelloSent`/`Init` arm) — echoing another one here would
                // land on a peer that has already moved on to HANDSHAKE.
                let mut actions = Actions::default();
                if self.role == Role::Client {
                    actions.send.push(ShipFrame::Control(
                        ship_protocol::ControlMessage::MessageProtocolHandshake(
                            MessageProtocolHandshake {
                                handshake_type: HandshakeType::AnnounceMax,
                                version: self.config.local_max_version,
                                formats: self.config.local_formats.clone(),
                            },
                        ),
                    ));
                }
                Ok(actions)
            }
        }
    }

    fn on_handshake(
        &mut self,
        hs: MessageProtocolHandshake,
    ) -> Result<Actions, SessionError> {
        match (self.role, hs.handshake_type) {
            (Role::Server, HandshakeType::AnnounceMax) => {
                match negotiate(
                    self.config.local_max_version,
                    &self.config.local_formats,
                    hs.version,
                    &hs.formats,
                ) {
                    Some((version, format)) => {
                        self.negotiated_format = Some(format);
                        self.state = SessionState::Pin;
                        Ok(Actions::send_one(ShipFrame::Control(
                            ship_protocol::ControlMessage::MessageProtocolHandshake(
                                MessageProtocolHandshake {
                                    handshake_type: HandshakeType::Select,
                                    version,
                                    formats: vec![format],
                                },
                            ),
                        )))
                    }
                    None => {
                        self.state = SessionState::Aborted;
                        Ok(Actions::send_one(ShipFrame::Control(
                            ship_protocol::ControlMessage::MessageProtocolHandshakeError(
                                MessageProtocolHandshakeError {
                                    error: HandshakeError::SelectionMismatch,
                                },
                            ),
                        )))
                    }
                }
            }
            (Role::Client, HandshakeType::Select) => {
                let version_ok = hs.version.major <= self.config.local_max_version.major
                    && hs.version.minor <= self.config.local_max_version.minor;
                let format_ok = hs
                    .formats
                    .first()
                    .is_some_and(|f| self.config.local_formats.contains(f));
                if version_ok && format_ok {
                    self.negotiated_format = hs.formats.first().copied();
                    self.state = SessionState::Pin;
                    Ok(Actions::default())
                } else {
                    self.state = SessionState::Aborted;
                    Ok(Actions::send_one(ShipFrame::Control(
                        ship_protocol::ControlMessage::MessageProtocolHandshakeError(
                            MessageProtocolHandshakeError {
                                error: HandshakeError::SelectionMismatch,
                            },
                        ),
                    )))
                }
            }
            _ => Err(self.violation("handshake message not valid for this role")),
        }
    }

    fn on_pin_state(&mut self, pin: ConnectionPinState) -> Result<Actions, SessionError> {
        match pin.pin_state {
            PinState::None => {
                self.state = SessionState::Access;
                Ok(Actions::default())
            }
            PinState::Required | PinState::Optional => {
                debug!(session = %self.id, "PIN entry is not supported, aborting");
                Ok(self.abort())
            }
            PinState::PinOk => Ok(Actions::default()),
        }
        .map(|actions| {
            if pin.input_permission == Some(PinInputPermission::Busy) {
                debug!(session = %self.id, "peer PIN input busy");
            }
            actions
        })
    }

    fn on_access_request(&mut self) -> Result<Actions, SessionError> {
        if self.role != Role::Server {
            return Err(self.violation("only a server answers accessMethodsRequest"));
        }
        self.state = SessionState::Data;
        Ok(Actions::send_one(ShipFrame::Control(
            ship_protocol::ControlMessage::AccessMethods(AccessMethods {
                id: self.local_ship_id.clone(),
                dns_sd_mdns: false,
                dns: None,
            }),
        )))
    }

    fn on_access_methods(&mut self, methods: AccessMethods) -> Result<Actions, SessionError> {
        if self.role != Role::Client {
            return Err(self.violation("only a client receives accessMethods"));
        }
        self.peer_ship_id = Some(methods.id);
        self.state = SessionState::Data;
        Ok(Actions::default())
    }

    fn on_data(&mut self, data: &DataMessage) -> Result<Actions, SessionError> {
        Ok(Actions {
            deliver_data: vec![data.payload.clone()],
            ..Default::default()
        })
    }

    /// Declare that this side requires no PIN, once PIN entry is not a
    /// supported collaborator (it never is, in this core). Both roles call
    /// this upon reaching PIN so each peer receives the `none` state and
    /// advances to ACCESS per `on_pin_state`.
    pub fn declare_no_pin_required(&self) -> Result<ShipFrame, SessionError> {
        if self.state != SessionState::Pin {
            return Err(self.violation("declare_no_pin_required called outside PIN"));
        }
        Ok(ShipFrame::Control(ship_protocol::ControlMessage::ConnectionPinState(
            ConnectionPinState {
                pin_state: PinState::None,
                input_permission: None,
            },
        )))
    }

    /// Begin the ACCESS phase as a client by requesting the peer's access
    /// methods. Valid only once the handshake has reached ACCESS for the
    /// client role — callers invoke this right after `on_pin_state`
    /// transitions to `Access`.
    pub fn request_access_methods(&self) -> Result<ShipFrame, SessionError> {
        if self.role != Role::Client || self.state != SessionState::Access {
            return Err(self.violation("request_access_methods called out of order"));
        }
        Ok(ShipFrame::Control(
            ship_protocol::ControlMessage::AccessMethodsRequest,
        ))
    }

    pub fn peer_ship_id(&self) -> Option<&str> {
        self.peer_ship_id.as_deref()
    }
}
