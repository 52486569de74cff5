// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process adapters for the core's collaborator ports.
//!
//! Real outbound delivery (email, SMS) and the real payment gateway are
//! external collaborators. These adapters log what would be sent and
//! feed the staff dashboard stream, which is all this server owes the
//! lifecycle core.

use std::sync::Arc;
use tracing::info;

use crate::live::{LiveEvent, LiveEventBroadcaster};
use kairos::{NotificationKind, Notifier, PaymentRelease, PaymentReleaseError};
use kairos_domain::Role;

/// Notifier adapter: logs each outbound notification and mirrors it
/// onto the live dashboard stream.
///
/// Both channels are fire-and-forget; nothing here can fail the
/// transition that queued the notification.
pub struct BroadcastNotifier {
    /// The dashboard event broadcaster.
    broadcaster: Arc<LiveEventBroadcaster>,
}

impl BroadcastNotifier {
    /// Creates a notifier bound to the given broadcaster.
    #[must_use]
    pub const fn new(broadcaster: Arc<LiveEventBroadcaster>) -> Self {
        Self { broadcaster }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, recipient: Role, appointment_id: i64, kind: NotificationKind) {
        info!(
            recipient = recipient.as_str(),
            appointment_id,
            kind = kind.as_str(),
            "Queued outbound notification"
        );
        self.broadcaster
            .broadcast(&LiveEvent::from_notification(appointment_id, kind));
    }
}

/// Payment release adapter.
///
/// The real gateway integration is out of scope; this adapter records
/// the release decision, which is the part the lifecycle owns.
pub struct LoggingPaymentGateway;

impl PaymentRelease for LoggingPaymentGateway {
    fn release_payment(&mut self, appointment_id: i64) -> Result<(), PaymentReleaseError> {
        info!(
            appointment_id,
            "Released captured payment to the practitioner"
        );
        Ok(())
    }
}
