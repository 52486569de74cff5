// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use kairos_domain::PaymentDisposition;

/// The outcome an admin chooses when resolving a dispute.
///
/// There is no third path: a contested appointment is either validated
/// (practitioner paid) or cancelled; it never drifts back to `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeOutcome {
    /// The session is deemed delivered; payment is released.
    Validated,
    /// The session is deemed not delivered; the appointment is cancelled.
    Cancelled,
}

impl DisputeOutcome {
    /// Returns the string representation of the outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validated => "validated",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A command represents actor intent as data only.
///
/// Commands are the only way to request appointment state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record that payment was captured upstream, confirming the booking.
    ConfirmPayment,
    /// The practitioner reports the session as delivered.
    MarkCompleted,
    /// The client (or staff) confirms delivery, releasing payment.
    Validate {
        /// Optional free-text comment stored as a public client comment.
        comment: Option<String>,
    },
    /// The client contests the reported completion.
    ReportProblem {
        /// What went wrong. Must be non-empty.
        description: String,
    },
    /// Any party cancels a not-yet-delivered appointment.
    Cancel {
        /// Optional free-text cancellation reason.
        reason: Option<String>,
        /// Disposition of a captured payment. Admin only; absent for
        /// other roles, in which case the payment stays held.
        disposition: Option<PaymentDisposition>,
    },
    /// Staff closes a dispute with an admin-determined outcome.
    ResolveDispute {
        /// The chosen outcome.
        outcome: DisputeOutcome,
        /// Disposition of the frozen payment when cancelling.
        disposition: Option<PaymentDisposition>,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::ConfirmPayment => "ConfirmPayment",
            Self::MarkCompleted => "MarkCompleted",
            Self::Validate { .. } => "Validate",
            Self::ReportProblem { .. } => "ReportProblem",
            Self::Cancel { .. } => "Cancel",
            Self::ResolveDispute { .. } => "ResolveDispute",
        }
    }
}
