// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The appointment transition function.
//!
//! `apply` is pure: it reads the current appointment value and produces
//! the new value, exactly one audit event, and the side effects the
//! commit must carry out. It never touches a database or a clock; the
//! caller supplies `now` and commits the result atomically.

use crate::authz;
use crate::command::{Command, DisputeOutcome};
use crate::error::CoreError;
use crate::notification::NotificationKind;
use crate::transition::{CommentDraft, Effect, TransitionResult};
use kairos_audit::{Action, Actor, AuditEvent, Cause, StatusSnapshot};
use kairos_domain::{
    ActorRef, Appointment, AppointmentStatus, CommentKind, CommentVisibility, DomainError,
    PaymentDisposition, PaymentStatus, Role, validate_problem_description,
};
use time::OffsetDateTime;

/// Applies a command to an appointment, producing the transition result.
///
/// The authorization predicate is evaluated first, before any
/// precondition check, so a forbidden request never learns anything
/// about the appointment's state and never mutates it.
///
/// # Arguments
///
/// * `appointment` - The current appointment value (immutable)
/// * `command` - The transition to apply
/// * `actor` - The actor requesting this transition
/// * `cause` - The cause or reason for this transition
/// * `now` - The current time, supplied by the caller
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new appointment value, the
///   audit event, and the side effects to commit
/// * `Err(CoreError)` if the actor is forbidden or a precondition fails
///
/// # Errors
///
/// Returns an error if:
/// - The actor fails the authorization predicate
/// - The appointment's status does not permit the transition
/// - Command-specific validation fails (empty problem description,
///   completion before the scheduled start, re-contestation)
pub fn apply(
    appointment: &Appointment,
    command: Command,
    actor: &ActorRef,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    // Authorization before preconditions, always
    authz::ensure_can_transition(actor, appointment, &command)?;

    let appointment_id: i64 = appointment.appointment_id().ok_or_else(|| {
        CoreError::Internal(String::from("appointment has no persisted identifier"))
    })?;

    match command {
        Command::ConfirmPayment => confirm_payment(appointment, appointment_id, actor, cause),
        Command::MarkCompleted => mark_completed(appointment, appointment_id, actor, cause, now),
        Command::Validate { comment } => {
            validate(appointment, appointment_id, actor, cause, comment)
        }
        Command::ReportProblem { description } => {
            report_problem(appointment, appointment_id, actor, cause, &description)
        }
        Command::Cancel {
            reason,
            disposition,
        } => cancel(
            appointment,
            appointment_id,
            actor,
            cause,
            reason.as_deref(),
            disposition,
        ),
        Command::ResolveDispute {
            outcome,
            disposition,
        } => resolve_dispute(appointment, appointment_id, actor, cause, outcome, disposition),
    }
}

/// Converts an actor reference into its audit representation.
fn audit_actor(actor: &ActorRef) -> Actor {
    Actor::new(actor.id.to_string(), actor.role.as_str().to_string())
}

/// Captures the audited status fields of an appointment.
const fn snapshot(appointment: &Appointment) -> StatusSnapshot {
    StatusSnapshot::new(appointment.status, appointment.payment_status)
}

/// Records that payment was captured upstream: `pending` → `confirmed`.
fn confirm_payment(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    appointment
        .status
        .validate_transition(AppointmentStatus::Confirmed)?;

    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = AppointmentStatus::Confirmed;
    new_appointment.payment_status = PaymentStatus::Captured;

    let action: Action = Action::new(
        String::from("ConfirmPayment"),
        Some(format!(
            "Payment captured for appointment {}",
            appointment.reference_code
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects: vec![
            Effect::Notify {
                recipient: Role::Client,
                kind: NotificationKind::PaymentConfirmed,
            },
            Effect::Notify {
                recipient: Role::Practitioner,
                kind: NotificationKind::PaymentConfirmed,
            },
        ],
    })
}

/// The practitioner reports delivery: `confirmed` → `completed`.
///
/// Guarded against double-firing: any status other than `confirmed` is a
/// precondition violation, never a silent success, so the completion
/// audit trail cannot be written twice.
fn mark_completed(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    appointment
        .status
        .validate_transition(AppointmentStatus::Completed)?;

    // A session cannot be reported as delivered before it was due to start
    if appointment.start_time > now {
        return Err(CoreError::DomainViolation(
            DomainError::AppointmentNotStarted {
                start_time: appointment.start_time.to_string(),
            },
        ));
    }

    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = AppointmentStatus::Completed;

    let action: Action = Action::new(
        String::from("MarkCompleted"),
        Some(format!(
            "Practitioner reported appointment {} as delivered",
            appointment.reference_code
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects: vec![Effect::Notify {
            recipient: Role::Client,
            kind: NotificationKind::SessionCompleted,
        }],
    })
}

/// The client (or staff) confirms delivery: `completed`/`issue_reported`
/// → `validated`, releasing payment.
///
/// Payment release is the business guarantee of this whole core: it is
/// reachable only here and through the equivalent dispute-resolution
/// outcome, never from `completed` alone.
fn validate(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
    comment: Option<String>,
) -> Result<TransitionResult, CoreError> {
    appointment
        .status
        .validate_transition(AppointmentStatus::Validated)?;

    let closes_dispute: bool = appointment.status == AppointmentStatus::IssueReported;
    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = AppointmentStatus::Validated;
    new_appointment.payment_status = PaymentStatus::Released;

    let details: String = if closes_dispute {
        format!(
            "Appointment {} validated; open dispute resolved, payment released",
            appointment.reference_code
        )
    } else {
        format!(
            "Appointment {} validated, payment released",
            appointment.reference_code
        )
    };
    let action: Action = Action::new(String::from("Validate"), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    let mut effects: Vec<Effect> = vec![Effect::ReleasePayment];
    if let Some(body) = comment {
        if !body.trim().is_empty() {
            effects.push(Effect::RecordComment(CommentDraft {
                author_id: actor.id,
                author_role: actor.role,
                body,
                visibility: CommentVisibility::Public,
                kind: CommentKind::Normal,
            }));
        }
    }
    effects.push(Effect::Notify {
        recipient: Role::Practitioner,
        kind: NotificationKind::SessionValidated,
    });

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects,
    })
}

/// The client contests a reported completion: `completed` →
/// `issue_reported`, freezing payment.
///
/// Contestation is one-shot for the lifetime of the appointment: the
/// `contested` flag is set here and never cleared.
fn report_problem(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
    description: &str,
) -> Result<TransitionResult, CoreError> {
    appointment
        .status
        .validate_transition(AppointmentStatus::IssueReported)?;

    if appointment.contested {
        return Err(CoreError::DomainViolation(DomainError::AlreadyContested {
            appointment_id,
        }));
    }

    validate_problem_description(description)?;

    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = AppointmentStatus::IssueReported;
    new_appointment.payment_status = PaymentStatus::Frozen;
    new_appointment.contested = true;
    new_appointment.problem_description = Some(description.to_string());

    let action: Action = Action::new(
        String::from("ReportProblem"),
        Some(format!(
            "Client contested appointment {}, payment frozen",
            appointment.reference_code
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects: vec![
            // The problem report is always a public comment: the client
            // and staff must both be able to read it
            Effect::RecordComment(CommentDraft {
                author_id: actor.id,
                author_role: actor.role,
                body: description.to_string(),
                visibility: CommentVisibility::Public,
                kind: CommentKind::ProblemReport,
            }),
            Effect::Notify {
                recipient: Role::Admin,
                kind: NotificationKind::ProblemReported,
            },
        ],
    })
}

/// Any party cancels an undelivered appointment: `pending`/`confirmed`
/// → `cancelled`.
///
/// A captured payment is refunded only on an explicit admin disposition;
/// otherwise it stays held for a later admin decision. A disposition on
/// an uncaptured payment is ignored: there are no funds to dispose of.
fn cancel(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
    reason: Option<&str>,
    disposition: Option<PaymentDisposition>,
) -> Result<TransitionResult, CoreError> {
    // The issue_reported -> cancelled edge belongs to dispute resolution
    // alone; an open dispute never exits through a plain cancellation
    if appointment.status == AppointmentStatus::IssueReported {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: appointment.status.as_str().to_string(),
                to: AppointmentStatus::Cancelled.as_str().to_string(),
                reason: "an open dispute is closed by validation or staff resolution".to_string(),
            },
        ));
    }

    appointment
        .status
        .validate_transition(AppointmentStatus::Cancelled)?;

    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = AppointmentStatus::Cancelled;
    new_appointment.payment_status = match (appointment.payment_status, disposition) {
        (PaymentStatus::Captured, Some(PaymentDisposition::Refund)) => PaymentStatus::Refunded,
        (current, _) => current,
    };

    let mut details: String = format!("Appointment {} cancelled", appointment.reference_code);
    if let Some(text) = reason {
        details.push_str(&format!(": {text}"));
    }
    if let Some(chosen) = disposition {
        details.push_str(&format!(" (payment disposition: {})", chosen.as_str()));
    }

    let action: Action = Action::new(String::from("Cancel"), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects: vec![
            Effect::Notify {
                recipient: Role::Client,
                kind: NotificationKind::AppointmentCancelled,
            },
            Effect::Notify {
                recipient: Role::Practitioner,
                kind: NotificationKind::AppointmentCancelled,
            },
        ],
    })
}

/// Staff closes a dispute: `issue_reported` → `validated` or
/// `cancelled`.
///
/// A dispute has exactly two exits; it never drifts back to `completed`.
/// Cancelling resolves the frozen payment per the admin disposition,
/// defaulting to a refund (the contesting client prevailed).
fn resolve_dispute(
    appointment: &Appointment,
    appointment_id: i64,
    actor: &ActorRef,
    cause: Cause,
    outcome: DisputeOutcome,
    disposition: Option<PaymentDisposition>,
) -> Result<TransitionResult, CoreError> {
    let (new_status, new_payment_status, requires_release) = match outcome {
        DisputeOutcome::Validated => (
            AppointmentStatus::Validated,
            PaymentStatus::Released,
            true,
        ),
        DisputeOutcome::Cancelled => {
            let payment_status = match disposition {
                Some(PaymentDisposition::Retain) => PaymentStatus::Captured,
                Some(PaymentDisposition::Refund) | None => PaymentStatus::Refunded,
            };
            (AppointmentStatus::Cancelled, payment_status, false)
        }
    };

    appointment.status.validate_transition(new_status)?;

    let before: StatusSnapshot = snapshot(appointment);

    let mut new_appointment: Appointment = appointment.clone();
    new_appointment.status = new_status;
    new_appointment.payment_status = new_payment_status;

    let action: Action = Action::new(
        String::from("ResolveDispute"),
        Some(format!(
            "Staff resolved dispute on appointment {} as {}",
            appointment.reference_code,
            outcome.as_str()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        appointment_id,
        audit_actor(actor),
        cause,
        action,
        before,
        snapshot(&new_appointment),
    );

    let mut effects: Vec<Effect> = Vec::new();
    if requires_release {
        effects.push(Effect::ReleasePayment);
    }
    effects.push(Effect::Notify {
        recipient: Role::Client,
        kind: NotificationKind::DisputeResolved,
    });
    effects.push(Effect::Notify {
        recipient: Role::Practitioner,
        kind: NotificationKind::DisputeResolved,
    });

    Ok(TransitionResult {
        new_appointment,
        audit_event,
        effects,
    })
}
