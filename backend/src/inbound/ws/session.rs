//! Per-connection WebSocket session.
//!
//! One loop multiplexes three sources: the heartbeat timer, frames from the
//! client, and frames queued for this subscriber by the realtime hub. The
//! public contract pings every 5s and considers a connection idle after 10s
//! without client traffic. Tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::{SubscriberId, Subscription};
use crate::domain::{Confirmation, RealtimeEvent, TraceId};
use crate::inbound::ws::messages::{
    ClientMessage, FrameError, parse_client_frame, topic_names,
};
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    state: WsState,
    subscription: Subscription,
    session: Session,
    stream: MessageStream,
) {
    let Subscription { id, frames } = subscription;
    debug!(subscriber = %id, "realtime subscriber connected");
    WsSession { state, id }.run(session, stream, frames).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HubClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    id: SubscriberId,
}

impl WsSession {
    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut frames: tokio::sync::mpsc::UnboundedReceiver<String>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                frame = frames.recv() => match frame {
                    Some(frame) => session.text(frame).await.map_err(SessionError::Network),
                    None => Err(SessionError::HubClosed),
                },
            };

            if let Err(error) = result {
                self.state.registry.disconnect(self.id);
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(&self, text: &str) -> Result<(), SessionError> {
        let message = match parse_client_frame(text) {
            Ok(message) => message,
            Err(error @ FrameError::InvalidData { .. }) => {
                self.reply_failure(&error.to_string());
                return Ok(());
            }
            Err(error) => {
                warn!(subscriber = %self.id, error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };
        TraceId::scope(TraceId::generate(), self.dispatch(message)).await;
        Ok(())
    }

    /// Apply one client message. Replies travel through the hub like every
    /// other frame, so ordering with broadcasts is preserved.
    async fn dispatch(&self, message: ClientMessage) {
        match message {
            ClientMessage::JoinTagTopics(values) => {
                let topics = topic_names(values);
                let joined = self.state.registry.join(self.id, &topics);
                debug!(subscriber = %self.id, ?topics, joined, "joined tag topics");
            }
            ClientMessage::LeaveTagTopics(values) => {
                let topics = topic_names(values);
                let left = self.state.registry.leave(self.id, &topics);
                debug!(subscriber = %self.id, ?topics, left, "left tag topics");
            }
            ClientMessage::NewGuest(submission) => {
                if let Err(error) = self.state.guests.submit(submission).await {
                    self.reply_failure(error.message());
                }
            }
            ClientMessage::PhotoUploaded(registration) => {
                match self.state.photos.register_uploaded(registration).await {
                    Ok(_) => self.reply(Confirmation::ok()),
                    Err(error) => self.reply_failure(error.message()),
                }
            }
        }
    }

    fn reply_failure(&self, message: &str) {
        warn!(subscriber = %self.id, error = message, "realtime request failed");
        self.reply(Confirmation::failed(message));
    }

    fn reply(&self, confirmation: Confirmation) {
        self.state
            .publisher
            .publish_to(self.id, &RealtimeEvent::Confirmation(confirmation));
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(subscriber = %self.id, "WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(subscriber = %self.id, error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(subscriber = %self.id, error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed
            | SessionError::HubClosed => {
                debug!(subscriber = %self.id, "realtime subscriber disconnected");
            }
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::HubClosed => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Away,
                description: Some("server shutting down".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
