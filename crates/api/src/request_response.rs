// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API
//! contract. Timestamps are ISO 8601 strings; prices render through the
//! domain `Price` type so quote-on-request never shows as a number.

use serde::{Deserialize, Serialize};

/// API request to book a new appointment.
///
/// Booking happens upstream of the lifecycle core: the appointment is
/// created in `pending` status and confirmed once payment is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    /// The paying client.
    pub client_id: i64,
    /// The practitioner to book.
    pub practitioner_id: i64,
    /// The person actually served, when distinct from the client.
    pub beneficiary_id: Option<i64>,
    /// The service to book.
    pub service_id: i64,
    /// Practitioner-specific override price in cents, if any.
    pub custom_price_cents: Option<i64>,
    /// Scheduled session start (ISO 8601).
    pub start_time: String,
    /// Scheduled session end (ISO 8601).
    pub end_time: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Video meeting link for remote sessions.
    pub meeting_link: Option<String>,
}

/// API response for a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentResponse {
    /// The appointment's canonical identifier.
    pub appointment_id: i64,
    /// The human-readable reference code.
    pub reference_code: String,
    /// The initial status (always `pending`).
    pub status: String,
    /// A success message.
    pub message: String,
}

/// API response for a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    /// The appointment's canonical identifier.
    pub appointment_id: i64,
    /// The human-readable reference code.
    pub reference_code: String,
    /// The status after the transition.
    pub status: String,
    /// The payment status after the transition.
    pub payment_status: String,
    /// Whether the appointment has ever been contested.
    pub contested: bool,
    /// A success message.
    pub message: String,
    /// The ID of the persisted audit event.
    pub event_id: i64,
}

/// API request to validate a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// Optional free-text comment, stored as a public comment.
    pub comment: Option<String>,
}

/// API request to contest a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProblemRequest {
    /// What went wrong. Must be non-empty.
    pub description: String,
}

/// API request to cancel an undelivered appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    /// Optional free-text cancellation reason.
    pub reason: Option<String>,
    /// Disposition of a captured payment (`refund` | `retain`).
    /// Admin only.
    pub disposition: Option<String>,
}

/// API request to resolve an open dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveDisputeRequest {
    /// The chosen outcome (`validated` | `cancelled`).
    pub outcome: String,
    /// Disposition of the frozen payment when cancelling
    /// (`refund` | `retain`; defaults to refund).
    pub disposition: Option<String>,
}

/// A party (client or practitioner) in an appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    /// The party's canonical identifier.
    pub id: i64,
    /// The party's display name.
    pub full_name: String,
    /// The party's contact email.
    pub email: String,
}

/// The booked service in an appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// The service's canonical identifier.
    pub service_id: i64,
    /// The service name.
    pub name: String,
    /// The list price rendered for display ("on request" for the
    /// quote-on-request sentinel, never a number).
    pub price_display: String,
}

/// The beneficiary in an appointment record.
///
/// Birth and contact fields are present only when the requesting actor
/// passes the appointment view check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryInfo {
    /// The beneficiary's canonical identifier.
    pub beneficiary_id: i64,
    /// The beneficiary's full name.
    pub full_name: String,
    /// Birth date (ISO 8601 date), redacted for unauthorized actors.
    pub birth_date: Option<String>,
    /// Contact email, redacted for unauthorized actors.
    pub email: Option<String>,
    /// Contact phone, redacted for unauthorized actors.
    pub phone: Option<String>,
}

/// Read-side assembly of an appointment with its related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    /// The appointment's canonical identifier.
    pub appointment_id: i64,
    /// The human-readable reference code.
    pub reference_code: String,
    /// The lifecycle status.
    pub status: String,
    /// The payment status.
    pub payment_status: String,
    /// Scheduled session start (ISO 8601).
    pub start_time: String,
    /// Scheduled session end (ISO 8601).
    pub end_time: String,
    /// The billed price rendered for display.
    pub price_display: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Video meeting link for remote sessions.
    pub meeting_link: Option<String>,
    /// The client's problem description, when contested.
    pub problem_description: Option<String>,
    /// Whether the appointment has ever been contested.
    pub contested: bool,
    /// The paying client.
    pub client: PartyInfo,
    /// The assigned practitioner.
    pub practitioner: PartyInfo,
    /// The booked service.
    pub service: ServiceInfo,
    /// The beneficiary, when distinct from the client.
    pub beneficiary: Option<BeneficiaryInfo>,
}

/// A comment in an appointment's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInfo {
    /// The comment's canonical identifier.
    pub comment_id: i64,
    /// The author's canonical identifier.
    pub author_id: i64,
    /// The author's role.
    pub author_role: String,
    /// The comment text.
    pub body: String,
    /// Who may read this comment.
    pub visibility: String,
    /// What this comment records.
    pub kind: String,
    /// When the comment was created (ISO 8601).
    pub created_at: String,
}

/// API response listing an appointment's comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentListResponse {
    /// The appointment the comments belong to.
    pub appointment_id: i64,
    /// The comments, in creation order.
    pub comments: Vec<CommentInfo>,
}

/// A persisted audit event in an appointment's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The event's canonical identifier.
    pub event_id: i64,
    /// The actor's identifier.
    pub actor_id: String,
    /// The actor's role.
    pub actor_role: String,
    /// The cause identifier.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// Optional action details.
    pub action_details: Option<String>,
    /// Status before the transition.
    pub before_status: String,
    /// Payment status before the transition.
    pub before_payment_status: String,
    /// Status after the transition.
    pub after_status: String,
    /// Payment status after the transition.
    pub after_payment_status: String,
    /// When the transition was committed (ISO 8601).
    pub created_at: String,
}

/// API response listing an appointment's audit timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimelineResponse {
    /// The appointment the events belong to.
    pub appointment_id: i64,
    /// The events, in commit order.
    pub events: Vec<AuditEventInfo>,
}
