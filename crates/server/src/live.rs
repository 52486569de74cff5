// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live transition streaming for staff dashboards.
//!
//! Connected dashboards receive a WebSocket event for every committed
//! appointment transition. The stream is informational only: it carries
//! no commands, emits no audit events, and a dashboard that wants
//! authoritative state must still read it over HTTP. A dropped event is
//! therefore harmless.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{
    SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use kairos::NotificationKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Broadcast channel capacity. A dashboard that lags further than this
/// behind the stream starts losing the oldest events.
const CHANNEL_CAPACITY: usize = 100;

/// Live transition event types.
///
/// These events mirror the appointment lifecycle and are purely
/// informational. They are derived from committed transitions, not the
/// source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A new appointment was booked.
    AppointmentBooked {
        /// The appointment's canonical identifier.
        appointment_id: i64,
        /// The human-readable reference code.
        reference_code: String,
    },
    /// Payment was captured; the booking is confirmed.
    PaymentConfirmed {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// The practitioner reported the session as delivered.
    SessionCompleted {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// The client or staff validated the session; payment released.
    SessionValidated {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// The client contested a completed session.
    ProblemReported {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// Staff closed a dispute.
    DisputeResolved {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// The appointment was cancelled.
    AppointmentCancelled {
        /// The appointment's canonical identifier.
        appointment_id: i64,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl LiveEvent {
    /// Maps an outbound notification onto its dashboard event.
    #[must_use]
    pub const fn from_notification(appointment_id: i64, kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::PaymentConfirmed => Self::PaymentConfirmed { appointment_id },
            NotificationKind::SessionCompleted => Self::SessionCompleted { appointment_id },
            NotificationKind::SessionValidated => Self::SessionValidated { appointment_id },
            NotificationKind::ProblemReported => Self::ProblemReported { appointment_id },
            NotificationKind::DisputeResolved => Self::DisputeResolved { appointment_id },
            NotificationKind::AppointmentCancelled => Self::AppointmentCancelled { appointment_id },
        }
    }
}

/// Fan-out point for live transition events.
///
/// Wraps a `tokio::sync::broadcast` channel; every connected dashboard
/// holds a receiver.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publishes an event to every connected dashboard.
    ///
    /// Non-blocking. With no dashboards connected the event is simply
    /// dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => debug!(?event, receivers = count, "Broadcast live event"),
            Err(_) => debug!(?event, "No receivers for live event"),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles WebSocket upgrade requests for live event streaming.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, broadcaster))
}

/// Serializes one event onto the socket. A serialization failure is
/// logged and skipped; a send failure means the client went away.
async fn forward_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &LiveEvent,
) -> Result<(), ()> {
    match serde_json::to_string(event) {
        Ok(json) => sink.send(Message::Text(json.into())).await.map_err(|_| ()),
        Err(e) => {
            error!(?e, "Failed to serialize live event");
            Ok(())
        }
    }
}

/// Drains incoming frames so close handshakes and pings are honored.
/// Returns `true` while the connection should stay open.
fn keep_open(incoming: Option<Result<Message, axum::Error>>) -> bool {
    match incoming {
        Some(Ok(Message::Close(_))) | None => {
            debug!("Dashboard closed the live event stream");
            false
        }
        Some(Ok(Message::Text(_) | Message::Binary(_))) => {
            // The stream carries no commands in either direction
            warn!("Ignoring unexpected message on the live event stream");
            true
        }
        Some(Ok(Message::Ping(_) | Message::Pong(_))) => true,
        Some(Err(e)) => {
            error!(?e, "WebSocket receive error");
            false
        }
    }
}

/// Streams events to one connected dashboard until it disconnects.
async fn stream_events(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Dashboard connected to the live event stream");

    let (mut sink, mut incoming): (SplitSink<WebSocket, Message>, SplitStream<WebSocket>) =
        socket.split();
    let mut events: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let hello = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    };
    if forward_event(&mut sink, &hello).await.is_err() {
        warn!("Failed to send connection confirmation");
        return;
    }

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    if forward_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Dashboard fell behind the live event stream");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            frame = incoming.next() => {
                if !keep_open(frame) {
                    break;
                }
            }
        }
    }

    info!("Dashboard disconnected from the live event stream");
}
