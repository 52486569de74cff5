// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit timeline queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use kairos_audit::{Action, Actor, AuditEvent, Cause, StatusSnapshot};
use kairos_domain::{AppointmentStatus, PaymentStatus};

/// A persisted audit event together with its commit timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEvent {
    /// The reconstructed audit event, with its store-assigned ID.
    pub event: AuditEvent,
    /// When the transition was committed (ISO 8601).
    pub created_at: String,
}

/// Parses a stored status pair into a snapshot.
fn parse_snapshot(status: &str, payment_status: &str) -> Result<StatusSnapshot, PersistenceError> {
    let status: AppointmentStatus = AppointmentStatus::from_str(status)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    let payment_status: PaymentStatus = PaymentStatus::from_str(payment_status)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    Ok(StatusSnapshot::new(status, payment_status))
}

/// Rebuilds an audit event from its stored row.
fn row_to_event(row: AuditEventRow) -> Result<StoredAuditEvent, PersistenceError> {
    let before: StatusSnapshot = parse_snapshot(&row.before_status, &row.before_payment_status)?;
    let after: StatusSnapshot = parse_snapshot(&row.after_status, &row.after_payment_status)?;

    let event: AuditEvent = AuditEvent::new(
        row.appointment_id,
        Actor::new(row.actor_id, row.actor_role),
        Cause::new(row.cause_id, row.cause_description),
        Action::new(row.action_name, row.action_details),
        before,
        after,
    )
    .with_event_id(row.event_id);

    Ok(StoredAuditEvent {
        event,
        created_at: row.created_at,
    })
}

/// Lists the audit timeline of an appointment in event order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be rebuilt.
pub fn list_events(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::appointment_id.eq(appointment_id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?;

    rows.into_iter().map(row_to_event).collect()
}
