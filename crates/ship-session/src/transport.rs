//! The async drive loop that turns a raw byte-frame transport into
//! `Session` events and executes the actions the state machine returns.
//!
//! `Transport` is the out-of-scope collaborator (TLS/WebSocket I/O is an
//! external concern, see the ambient stack notes) — this module only
//! needs something that yields and accepts whole frames.

use crate::error::SessionError;
use crate::session::{Event, Session};
use crate::state::{Role, SessionState};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use ship_protocol::{decode_frame, encode_frame, ShipFrame};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Inbound handler for SPINE datagrams carried inside DATA frames. Owned by
/// the embedder; `spine-dispatch::Dispatcher` is the production
/// implementation.
pub trait DatagramSink: Send {
    fn on_datagram(&mut self, payload: Box<serde_json::value::RawValue>);
}

/// Drive one Session to completion over `transport`, reading and applying
/// frames, running the single timer, and draining `outbound` (frames the
/// embedder wants to send on the SPINE side, e.g. a `Sender::write` call)
/// into the same writer path so writes never race the dispatcher.
pub async fn run_session<T, E, D>(
    mut session: Session,
    mut transport: T,
    mut outbound: mpsc::Receiver<ShipFrame>,
    mut sink: D,
) -> Result<(), SessionError>
where
    T: Stream<Item = Result<Vec<u8>, E>> + Sink<Vec<u8>, Error = E> + Unpin,
    E: std::fmt::Display,
    D: DatagramSink,
{
    let mut timer = tokio::time::sleep(session.config.hello_timeout);
    tokio::pin!(timer);
    let mut timer_armed = false;
    let mut access_requested = false;
    let mut pin_declared = false;

    let actions = session.on_event(Event::Open)?;
    send_all(&mut transport, actions.send).await?;
    if let Some(d) = actions.rearm_timer {
        timer.as_mut().reset(tokio::time::Instant::now() + d);
        timer_armed = true;
    }

    loop {
        if session.state == SessionState::Aborted {
            return Ok(());
        }

        if !pin_declared && session.state == SessionState::Pin {
            pin_declared = true;
            let declaration = session.declare_no_pin_required()?;
            send_all(&mut transport, vec![declaration]).await?;
        }

        if !access_requested && session.role == Role::Client && session.state == SessionState::Access {
            access_requested = true;
            let request = session.request_access_methods()?;
            send_all(&mut transport, vec![request]).await?;
        }

        tokio::select! {
            biased;

            frame = transport.next() => {
                let Some(frame) = frame else {
                    return Err(SessionError::TransportClosed);
                };
                let bytes = frame.map_err(|e| SessionError::Transport(e.to_string()))?;
                let decoded = decode_frame(&bytes)?;
                let actions = session.on_event(Event::Frame(decoded))?;
                send_all(&mut transport, actions.send).await?;
                for payload in actions.deliver_data {
                    sink.on_datagram(payload);
                }
                if let Some(d) = actions.rearm_timer {
                    timer.as_mut().reset(tokio::time::Instant::now() + d);
                    timer_armed = true;
                }
            }

            Some(frame) = outbound.recv() => {
                if session.state != SessionState::Data {
                    warn!(state = session.state.name(), "dropping outbound frame outside DATA");
                    continue;
                }
                send_all(&mut transport, vec![frame]).await?;
            }

            () = &mut timer, if timer_armed => {
                timer_armed = false;
                let actions = session.on_event(Event::TimerExpired)?;
                send_all(&mut transport, actions.send).await?;
                if let Some(d) = actions.rearm_timer {
                    timer.as_mut().reset(tokio::time::Instant::now() + d);
                    timer_armed = true;
                }
            }
        }
    }
}

async fn send_all<T, E>(transport: &mut T, frames: Vec<ShipFrame>) -> Result<(), SessionError>
where
    T: Sink<Vec<u8>, Error = E> + Unpin,
    E: std::fmt::Display,
{
    for frame in frames {
        debug!(frame = ?frame.message_type(), "sending frame");
        let bytes = encode_frame(&frame)?;
        transport
            .send(bytes)
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
    }
    Ok(())
}
