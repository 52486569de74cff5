// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every transition handler follows the same shape: read the current
//! appointment, apply the command through the pure core (authorization
//! and preconditions included), commit the result atomically, then
//! dispatch the fire-and-forget notifications. The handler never writes
//! status itself.

use std::str::FromStr;
use time::OffsetDateTime;

use crate::auth::AuthenticatedActor;
use crate::error::{ApiError, map_persistence_error, translate_core_error, translate_domain_error};
use crate::projection::format_timestamp;
use crate::reference::generate_reference_code;
use crate::request_response::{
    AppointmentResponse, AuditEventInfo, AuditTimelineResponse, BookAppointmentRequest,
    BookAppointmentResponse, CancelRequest, CommentInfo, CommentListResponse,
    ReportProblemRequest, ResolveDisputeRequest, ValidateRequest,
};
use kairos::{
    Command, DisputeOutcome, Effect, Notifier, PaymentRelease, TransitionResult, apply,
    ensure_can_view,
};
use kairos_audit::Cause;
use kairos_domain::{
    Appointment, Beneficiary, Comment, DomainError, PaymentDisposition, Price, ReferenceCode,
    Role, ServiceOffering, validate_custom_price, validate_schedule,
};
use kairos_persistence::{SqliteStore, StoredAuditEvent};
use tracing::info;

/// The collaborator ports a transition handler needs from the hosting
/// process.
///
/// The payment port is consulted inside the commit transaction for
/// validating transitions; the notifier is called only after a
/// successful commit, and its failures never surface.
pub struct TransitionPorts<'a> {
    /// Releases captured funds to the practitioner.
    pub payments: &'a mut dyn PaymentRelease,
    /// Delivers outbound notifications, best-effort.
    pub notifier: &'a dyn Notifier,
}

/// Parses an ISO 8601 timestamp from a request field.
fn parse_timestamp(value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &time::format_description::well_known::Iso8601::DEFAULT).map_err(
        |e| {
            translate_domain_error(DomainError::TimestampParseError {
                value: value.to_string(),
                error: e.to_string(),
            })
        },
    )
}

/// Dispatches the notification effects of a committed transition.
///
/// Delivery is fire-and-forget: the notifier logs and swallows its own
/// failures, so nothing here can fail the already-committed transition.
fn dispatch_notifications(
    notifier: &dyn Notifier,
    appointment_id: i64,
    result: &TransitionResult,
) {
    for effect in &result.effects {
        if let Effect::Notify { recipient, kind } = effect {
            notifier.notify(*recipient, appointment_id, *kind);
        }
    }
}

/// Reads, applies, and atomically commits one transition command.
///
/// # Returns
///
/// The committed transition result and the persisted audit event ID.
///
/// # Errors
///
/// Returns an error if the appointment does not exist, the actor is
/// forbidden, a precondition fails (including losing a concurrent
/// status race), or the commit fails.
fn execute_transition(
    store: &mut SqliteStore,
    appointment_id: i64,
    command: Command,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<(TransitionResult, i64), ApiError> {
    let appointment: Appointment = store
        .get_appointment(appointment_id)
        .map_err(map_persistence_error)?;

    // The core evaluates authorization before preconditions
    let result: TransitionResult = apply(&appointment, command, &actor.to_actor_ref(), cause, now)
        .map_err(translate_core_error)?;

    let occurred_at: String = format_timestamp(now)?;
    let event_id: i64 = store
        .commit_transition(appointment.status, &result, &occurred_at, Some(ports.payments))
        .map_err(map_persistence_error)?;

    dispatch_notifications(ports.notifier, appointment_id, &result);

    Ok((result, event_id))
}

/// Builds the transition response from a committed result.
fn transition_response(
    result: &TransitionResult,
    event_id: i64,
    message: String,
) -> Result<AppointmentResponse, ApiError> {
    let appointment: &Appointment = &result.new_appointment;
    let appointment_id: i64 = appointment.appointment_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Committed appointment has no identifier"),
    })?;

    Ok(AppointmentResponse {
        appointment_id,
        reference_code: appointment.reference_code.value().to_string(),
        status: appointment.status.as_str().to_string(),
        payment_status: appointment.payment_status.as_str().to_string(),
        contested: appointment.contested,
        message,
        event_id,
    })
}

/// Records an upstream payment capture, confirming the booking.
///
/// # Arguments
///
/// * `store` - The persistence layer
/// * `appointment_id` - The appointment to confirm
/// * `actor` - The authenticated actor (must be staff)
/// * `cause` - The cause or reason for this action
/// * `now` - The current time, supplied by the caller
/// * `ports` - The collaborator ports
///
/// # Errors
///
/// Returns an error if the actor is not staff, the appointment does not
/// exist, or it is not in `pending` status.
pub fn confirm_payment(
    store: &mut SqliteStore,
    appointment_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let (result, event_id) = execute_transition(
        store,
        appointment_id,
        Command::ConfirmPayment,
        actor,
        cause,
        now,
        ports,
    )?;

    let message: String = format!(
        "Payment captured; appointment {} is confirmed",
        result.new_appointment.reference_code
    );
    transition_response(&result, event_id, message)
}

/// The practitioner reports a session as delivered.
///
/// Completion alone never releases payment; it only opens the
/// validation window for the client.
///
/// # Errors
///
/// Returns an error if the actor is not the assigned practitioner (or
/// staff), the appointment is not `confirmed`, or the scheduled start
/// is still in the future.
pub fn mark_completed(
    store: &mut SqliteStore,
    appointment_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let (result, event_id) = execute_transition(
        store,
        appointment_id,
        Command::MarkCompleted,
        actor,
        cause,
        now,
        ports,
    )?;

    let message: String = format!(
        "Appointment {} marked as completed; awaiting client validation",
        result.new_appointment.reference_code
    );
    transition_response(&result, event_id, message)
}

/// The client (or staff) confirms delivery, releasing payment.
///
/// The payment release runs inside the same transaction as the status
/// write; if the release fails the transition is rolled back and the
/// error surfaces as [`ApiError::PaymentReleaseFailed`], so the caller
/// knows no money moved.
///
/// # Errors
///
/// Returns an error if the actor is not the appointment's client (or
/// staff), the appointment is neither `completed` nor `issue_reported`,
/// or the payment release fails.
pub fn validate(
    store: &mut SqliteStore,
    appointment_id: i64,
    request: ValidateRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let command: Command = Command::Validate {
        comment: request.comment,
    };
    let (result, event_id) =
        execute_transition(store, appointment_id, command, actor, cause, now, ports)?;

    let message: String = format!(
        "Appointment {} validated; payment released to the practitioner",
        result.new_appointment.reference_code
    );
    transition_response(&result, event_id, message)
}

/// The client contests a session the practitioner reported as
/// delivered.
///
/// On success the appointment moves to `issue_reported`, the payment is
/// frozen, and a public problem-report comment is recorded in the same
/// commit. The staff notification is dispatched after the commit and
/// never rolls it back.
///
/// # Errors
///
/// Returns an error if the actor is not the appointment's client, the
/// appointment is not `completed`, it was already contested once, or
/// the description is empty.
pub fn report_problem(
    store: &mut SqliteStore,
    appointment_id: i64,
    request: ReportProblemRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let command: Command = Command::ReportProblem {
        description: request.description,
    };
    let (result, event_id) =
        execute_transition(store, appointment_id, command, actor, cause, now, ports)?;

    let message: String = format!(
        "Problem reported on appointment {}; payment frozen pending resolution",
        result.new_appointment.reference_code
    );
    transition_response(&result, event_id, message)
}

/// Cancels an undelivered appointment.
///
/// A payment disposition may only be supplied by staff; a non-staff
/// cancellation of a paid appointment leaves the captured payment held
/// for a later staff decision.
///
/// # Errors
///
/// Returns an error if the actor is not a party to the appointment, a
/// disposition is supplied by a non-staff actor, the disposition string
/// is not recognized, or the appointment is already delivered or
/// terminal.
pub fn cancel(
    store: &mut SqliteStore,
    appointment_id: i64,
    request: CancelRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let disposition: Option<PaymentDisposition> = match request.disposition.as_deref() {
        Some(value) => Some(PaymentDisposition::from_str(value).map_err(translate_domain_error)?),
        None => None,
    };

    let command: Command = Command::Cancel {
        reason: request.reason,
        disposition,
    };
    let (result, event_id) =
        execute_transition(store, appointment_id, command, actor, cause, now, ports)?;

    let message: String = if result.new_appointment.payment_status.is_held() {
        format!(
            "Appointment {} cancelled; captured payment held for staff review",
            result.new_appointment.reference_code
        )
    } else {
        format!(
            "Appointment {} cancelled",
            result.new_appointment.reference_code
        )
    };
    transition_response(&result, event_id, message)
}

/// Staff closes an open dispute with an admin-determined outcome.
///
/// # Errors
///
/// Returns an error if the actor is not staff, the outcome string is
/// not recognized, or the appointment has no open dispute.
pub fn resolve_dispute(
    store: &mut SqliteStore,
    appointment_id: i64,
    request: ResolveDisputeRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    ports: TransitionPorts<'_>,
) -> Result<AppointmentResponse, ApiError> {
    let ResolveDisputeRequest {
        outcome,
        disposition,
    } = request;
    let outcome: DisputeOutcome = match outcome.as_str() {
        "validated" => DisputeOutcome::Validated,
        "cancelled" => DisputeOutcome::Cancelled,
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("outcome"),
                message: format!("Unknown dispute outcome '{other}'"),
            });
        }
    };
    let disposition: Option<PaymentDisposition> = match disposition.as_deref() {
        Some(value) => Some(PaymentDisposition::from_str(value).map_err(translate_domain_error)?),
        None => None,
    };

    let command: Command = Command::ResolveDispute {
        outcome,
        disposition,
    };
    let (result, event_id) =
        execute_transition(store, appointment_id, command, actor, cause, now, ports)?;

    let message: String = format!(
        "Dispute on appointment {} resolved as {}",
        result.new_appointment.reference_code,
        outcome.as_str()
    );
    transition_response(&result, event_id, message)
}

/// Books a new appointment in `pending` status.
///
/// Booking sits upstream of the lifecycle core: no audit event is
/// emitted and no payment has been captured yet. The appointment enters
/// the state machine once the capture callback confirms it.
///
/// # Arguments
///
/// * `store` - The persistence layer
/// * `request` - The booking request
/// * `actor` - The authenticated actor (the booking client, or staff)
/// * `now` - The current time, supplied by the caller
///
/// # Errors
///
/// Returns an error if:
/// - The actor is a practitioner, or a client booking for another account
/// - The schedule is invalid or a timestamp cannot be parsed
/// - A referenced party, service, or beneficiary does not exist
/// - The beneficiary belongs to a different client account
/// - The custom price undercuts the service list price
pub fn book_appointment(
    store: &mut SqliteStore,
    request: BookAppointmentRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<BookAppointmentResponse, ApiError> {
    // Clients book for their own account; staff may book on behalf
    match actor.role {
        Role::Admin => {}
        Role::Client if request.client_id == actor.id => {}
        Role::Client => {
            return Err(ApiError::Forbidden {
                action: String::from("book_appointment"),
                reason: String::from("a client may book only for their own account"),
            });
        }
        Role::Practitioner => {
            return Err(ApiError::Forbidden {
                action: String::from("book_appointment"),
                reason: String::from("booking is reserved to clients and staff"),
            });
        }
    }

    let start_time: OffsetDateTime = parse_timestamp(&request.start_time)?;
    let end_time: OffsetDateTime = parse_timestamp(&request.end_time)?;
    validate_schedule(start_time, end_time).map_err(translate_domain_error)?;

    // Resolve the referenced records; a dangling reference is NotFound
    store
        .get_client(request.client_id)
        .map_err(map_persistence_error)?;
    store
        .get_practitioner(request.practitioner_id)
        .map_err(map_persistence_error)?;
    let service: ServiceOffering = store
        .get_service(request.service_id)
        .map_err(map_persistence_error)?;

    // The price floor is checked at write time, before any state exists
    if let Some(custom_cents) = request.custom_price_cents {
        validate_custom_price(custom_cents, &service.list_price).map_err(translate_domain_error)?;
    }

    if let Some(beneficiary_id) = request.beneficiary_id {
        let beneficiary: Beneficiary = store
            .get_beneficiary(beneficiary_id)
            .map_err(map_persistence_error)?;
        if beneficiary.client_id != request.client_id {
            return Err(ApiError::InvalidInput {
                field: String::from("beneficiary_id"),
                message: String::from("Beneficiary does not belong to the booking client"),
            });
        }
    }

    let reference_code: ReferenceCode = generate_reference_code();
    let list_price: Price = service.list_price;

    let mut appointment: Appointment = Appointment::new(
        reference_code.clone(),
        request.client_id,
        request.practitioner_id,
        request.beneficiary_id,
        request.service_id,
        list_price,
        request.custom_price_cents,
        start_time,
        end_time,
    );
    appointment.notes = request.notes;
    appointment.meeting_link = request.meeting_link;

    let created_at: String = format_timestamp(now)?;
    let appointment_id: i64 = store
        .create_appointment(&appointment, &created_at)
        .map_err(map_persistence_error)?;

    info!(
        appointment_id,
        reference_code = reference_code.value(),
        client_id = request.client_id,
        practitioner_id = request.practitioner_id,
        "Booked new appointment"
    );

    Ok(BookAppointmentResponse {
        appointment_id,
        reference_code: reference_code.value().to_string(),
        status: appointment.status.as_str().to_string(),
        message: format!("Booked appointment {reference_code}; awaiting payment capture"),
    })
}

/// Lists the comments on an appointment, redacting staff-only entries
/// for non-staff actors.
///
/// # Errors
///
/// Returns an error if the appointment does not exist or the actor
/// fails the view check.
pub fn list_comments(
    store: &mut SqliteStore,
    appointment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<CommentListResponse, ApiError> {
    let appointment: Appointment = store
        .get_appointment(appointment_id)
        .map_err(map_persistence_error)?;
    ensure_can_view(&actor.to_actor_ref(), &appointment).map_err(translate_core_error)?;

    let include_staff_only: bool = actor.role.is_staff();
    let comments: Vec<Comment> = store
        .list_comments(appointment_id, include_staff_only)
        .map_err(map_persistence_error)?;

    let comments: Vec<CommentInfo> = comments
        .into_iter()
        .map(|comment| {
            let comment_id: i64 = comment.comment_id.ok_or_else(|| ApiError::Internal {
                message: String::from("Stored comment has no identifier"),
            })?;
            Ok(CommentInfo {
                comment_id,
                author_id: comment.author_id,
                author_role: comment.author_role.as_str().to_string(),
                body: comment.body,
                visibility: comment.visibility.as_str().to_string(),
                kind: comment.kind.as_str().to_string(),
                created_at: comment.created_at,
            })
        })
        .collect::<Result<Vec<CommentInfo>, ApiError>>()?;

    Ok(CommentListResponse {
        appointment_id,
        comments,
    })
}

/// Deletes a comment. Comments are append-only for everyone else;
/// only staff may remove one.
///
/// # Errors
///
/// Returns an error if the actor is not staff or the comment does not
/// exist.
pub fn delete_comment(
    store: &mut SqliteStore,
    comment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    if !actor.role.is_staff() {
        return Err(ApiError::Forbidden {
            action: String::from("delete_comment"),
            reason: String::from("comments are removed by staff only"),
        });
    }

    store
        .delete_comment(comment_id)
        .map_err(map_persistence_error)
}

/// Lists the audit timeline of an appointment in commit order.
///
/// # Errors
///
/// Returns an error if the appointment does not exist or the actor
/// fails the view check.
pub fn get_audit_timeline(
    store: &mut SqliteStore,
    appointment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<AuditTimelineResponse, ApiError> {
    let appointment: Appointment = store
        .get_appointment(appointment_id)
        .map_err(map_persistence_error)?;
    ensure_can_view(&actor.to_actor_ref(), &appointment).map_err(translate_core_error)?;

    let stored: Vec<StoredAuditEvent> = store
        .list_audit_events(appointment_id)
        .map_err(map_persistence_error)?;

    let events: Vec<AuditEventInfo> = stored
        .into_iter()
        .map(|stored| {
            let event_id: i64 = stored.event.event_id.ok_or_else(|| ApiError::Internal {
                message: String::from("Stored audit event has no identifier"),
            })?;
            Ok(AuditEventInfo {
                event_id,
                actor_id: stored.event.actor.id,
                actor_role: stored.event.actor.role,
                cause_id: stored.event.cause.id,
                cause_description: stored.event.cause.description,
                action_name: stored.event.action.name,
                action_details: stored.event.action.details,
                before_status: stored.event.before.status.as_str().to_string(),
                before_payment_status: stored.event.before.payment_status.as_str().to_string(),
                after_status: stored.event.after.status.as_str().to_string(),
                after_payment_status: stored.event.after.payment_status.as_str().to_string(),
                created_at: stored.created_at,
            })
        })
        .collect::<Result<Vec<AuditEventInfo>, ApiError>>()?;

    Ok(AuditTimelineResponse {
        appointment_id,
        events,
    })
}
