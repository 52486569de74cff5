// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event mutations.
//!
//! Audit events are append-only and inserted in the same transaction as
//! the status write they record.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::NewAuditEvent;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::sqlite::last_insert_rowid;
use kairos_audit::AuditEvent;

/// Inserts an audit event and returns its assigned ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event` - The audit event to persist
/// * `created_at` - The transition timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let record: NewAuditEvent = NewAuditEvent {
        appointment_id: event.appointment_id,
        actor_id: event.actor.id.clone(),
        actor_role: event.actor.role.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_status: event.before.status.as_str().to_string(),
        before_payment_status: event.before.payment_status.as_str().to_string(),
        after_status: event.after.status.as_str().to_string(),
        after_payment_status: event.after.payment_status.as_str().to_string(),
        created_at: created_at.to_string(),
    };

    diesel::insert_into(audit_events::table)
        .values(&record)
        .execute(conn)?;

    let event_id: i64 = last_insert_rowid(conn)?;
    debug!(
        event_id,
        appointment_id = event.appointment_id,
        action = %event.action.name,
        "Inserted audit event"
    );
    Ok(event_id)
}
