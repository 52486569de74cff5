// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound notification port.
//!
//! Notification delivery is an external collaborator. The core decides
//! *what* to emit; implementations decide how to deliver it. Delivery is
//! fire-and-forget: a lost notification is recoverable via dashboards,
//! a lost state transition is not.

use kairos_domain::Role;

/// The kinds of outbound notifications the lifecycle emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Payment was captured; the booking is confirmed.
    PaymentConfirmed,
    /// The practitioner reported the session as delivered.
    SessionCompleted,
    /// The client or staff validated the session; payment released.
    SessionValidated,
    /// The client contested a completed session.
    ProblemReported,
    /// Staff closed a dispute.
    DisputeResolved,
    /// The appointment was cancelled.
    AppointmentCancelled,
}

impl NotificationKind {
    /// Returns the string representation of the notification kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentConfirmed => "payment_confirmed",
            Self::SessionCompleted => "session_completed",
            Self::SessionValidated => "session_validated",
            Self::ProblemReported => "problem_reported",
            Self::DisputeResolved => "dispute_resolved",
            Self::AppointmentCancelled => "appointment_cancelled",
        }
    }
}

/// Outbound notification delivery.
///
/// Implementations must not fail the caller: delivery errors are logged
/// and swallowed inside the implementation.
pub trait Notifier {
    /// Enqueues a notification for every actor holding `recipient` role
    /// on the given appointment.
    fn notify(&self, recipient: Role, appointment_id: i64, kind: NotificationKind);
}
