// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use kairos_domain::{AppointmentStatus, PaymentStatus};

/// Represents the entity performing a transition.
///
/// An actor is any identifiable entity that initiates a state change:
/// a client, a practitioner, or an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The actor's canonical identifier, as a string.
    pub id: String,
    /// The actor's role (e.g., "client", "practitioner", "admin").
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The actor's canonical identifier
    /// * `role` - The actor's role
    #[must_use]
    pub const fn new(id: String, role: String) -> Self {
        Self { id, role }
    }
}

/// Represents the reason or trigger for a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this transition
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific transition performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`MarkCompleted`", "`Validate`").
    pub name: String,
    /// Optional additional details, such as a cancellation reason.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The audited state of an appointment at a point in time.
///
/// The lifecycle status and the payment status are the two fields the
/// state machine owns, so they are what every audit event captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// The lifecycle status.
    pub status: AppointmentStatus,
    /// The payment status.
    pub payment_status: PaymentStatus,
}

impl StatusSnapshot {
    /// Creates a new `StatusSnapshot`.
    #[must_use]
    pub const fn new(status: AppointmentStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
        }
    }
}

/// An immutable audit event recording a single appointment transition.
///
/// Every successful transition must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the transition (actor)
/// - Why it was performed (cause)
/// - What transition was performed (action)
/// - The status before the transition (before)
/// - The status after the transition (after)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The store-assigned identifier, populated after persistence.
    pub event_id: Option<i64>,
    /// The appointment this event belongs to.
    pub appointment_id: i64,
    /// The actor who initiated this transition.
    pub actor: Actor,
    /// The cause or reason for this transition.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The status before the transition.
    pub before: StatusSnapshot,
    /// The status after the transition.
    pub after: StatusSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `appointment_id` - The appointment scope
    /// * `actor` - The actor who initiated the transition
    /// * `cause` - The reason for the transition
    /// * `action` - The action that was performed
    /// * `before` - The status before the transition
    /// * `after` - The status after the transition
    #[must_use]
    pub const fn new(
        appointment_id: i64,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StatusSnapshot,
        after: StatusSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            appointment_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Attaches the store-assigned event identifier.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: AppointmentStatus, payment_status: PaymentStatus) -> StatusSnapshot {
        StatusSnapshot::new(status, payment_status)
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("17"), String::from("client"));

        assert_eq!(actor.id, "17");
        assert_eq!(actor.role, "client");
    }

    #[test]
    fn test_cause_creation_requires_all_fields() {
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Client request"));

        assert_eq!(cause.id, "req-456");
        assert_eq!(cause.description, "Client request");
    }

    #[test]
    fn test_action_creation_with_and_without_details() {
        let bare: Action = Action::new(String::from("MarkCompleted"), None);
        assert_eq!(bare.name, "MarkCompleted");
        assert_eq!(bare.details, None);

        let detailed: Action = Action::new(
            String::from("Cancel"),
            Some(String::from("client travel conflict")),
        );
        assert_eq!(detailed.details.as_deref(), Some("client travel conflict"));
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("17"), String::from("client"));
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Client request"));
        let action: Action = Action::new(String::from("Validate"), None);
        let before = snapshot(AppointmentStatus::Completed, PaymentStatus::Captured);
        let after = snapshot(AppointmentStatus::Validated, PaymentStatus::Released);

        let event: AuditEvent = AuditEvent::new(
            9,
            actor.clone(),
            cause.clone(),
            action.clone(),
            before,
            after,
        );

        assert_eq!(event.event_id, None);
        assert_eq!(event.appointment_id, 9);
        assert_eq!(event.actor, actor);
        assert_eq!(event.cause, cause);
        assert_eq!(event.action, action);
        assert_eq!(event.before, before);
        assert_eq!(event.after, after);
    }

    #[test]
    fn test_with_event_id_populates_identifier() {
        let event: AuditEvent = AuditEvent::new(
            9,
            Actor::new(String::from("17"), String::from("client")),
            Cause::new(String::from("req-1"), String::from("Client request")),
            Action::new(String::from("Validate"), None),
            snapshot(AppointmentStatus::Completed, PaymentStatus::Captured),
            snapshot(AppointmentStatus::Validated, PaymentStatus::Released),
        )
        .with_event_id(101);

        assert_eq!(event.event_id, Some(101));
    }

    #[test]
    fn test_snapshot_equality() {
        let a = snapshot(AppointmentStatus::Completed, PaymentStatus::Captured);
        let b = snapshot(AppointmentStatus::Completed, PaymentStatus::Captured);
        let c = snapshot(AppointmentStatus::Completed, PaymentStatus::Frozen);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
