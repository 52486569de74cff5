// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The atomic transition commit.
//!
//! A transition is one transaction: the conditional status write, the
//! audit insert, any comment inserts, and (for validation) the payment
//! release either all land or none do. The conditional `WHERE status =
//! expected` clause is the optimistic-concurrency guard: two callers
//! racing the same transition cannot both match the row.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, warn};

use crate::diesel_schema::appointments;
use crate::error::PersistenceError;
use crate::mutations::{audit, comments};
use kairos::{PaymentRelease, TransitionResult};
use kairos_domain::AppointmentStatus;

/// Commits a transition result atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `expected_status` - The status the appointment held when the
///   transition was computed; the write is conditional on it
/// * `result` - The transition result to commit
/// * `occurred_at` - The transition timestamp (ISO 8601); the audit
///   event and any comments are attributed to it
/// * `payments` - The payment release port; required when the
///   transition releases payment
///
/// # Returns
///
/// The ID of the persisted audit event.
///
/// # Errors
///
/// Returns an error if:
/// - `PersistenceError::StaleStatus` - the appointment's status moved
///   under the caller; nothing was written
/// - `PersistenceError::PaymentReleaseAborted` - the payment release
///   failed; the whole transaction was rolled back
/// - any insert fails (also rolling the transaction back)
pub fn commit_transition(
    conn: &mut SqliteConnection,
    expected_status: AppointmentStatus,
    result: &TransitionResult,
    occurred_at: &str,
    mut payments: Option<&mut dyn PaymentRelease>,
) -> Result<i64, PersistenceError> {
    let new_appointment = &result.new_appointment;
    let appointment_id: i64 = new_appointment.appointment_id().ok_or_else(|| {
        PersistenceError::Other("Transition result has no appointment identifier".to_string())
    })?;

    if result.requires_payment_release() && payments.is_none() {
        return Err(PersistenceError::Other(
            "Payment release port required for a validating transition".to_string(),
        ));
    }

    conn.transaction::<i64, PersistenceError, _>(|conn| {
        // Conditional status write: zero rows means the caller lost the race
        let updated: usize = diesel::update(
            appointments::table
                .filter(appointments::appointment_id.eq(appointment_id))
                .filter(appointments::status.eq(expected_status.as_str())),
        )
        .set((
            appointments::status.eq(new_appointment.status.as_str()),
            appointments::payment_status.eq(new_appointment.payment_status.as_str()),
            appointments::problem_description.eq(new_appointment.problem_description.clone()),
            appointments::contested.eq(i32::from(new_appointment.contested)),
            appointments::updated_at.eq(occurred_at),
        ))
        .execute(conn)?;

        if updated == 0 {
            warn!(
                appointment_id,
                expected = expected_status.as_str(),
                "Conditional status write matched no row"
            );
            return Err(PersistenceError::StaleStatus {
                appointment_id,
                expected: expected_status.as_str().to_string(),
            });
        }

        // Audit emission is synchronous: no audit record, no transition
        let event_id: i64 = audit::insert_audit_event(conn, &result.audit_event, occurred_at)?;

        for draft in result.comment_drafts() {
            comments::insert_comment_draft(conn, appointment_id, draft, occurred_at)?;
        }

        // Release inside the transaction: a failure rolls everything back,
        // so the appointment can never read validated-but-unpaid
        if result.requires_payment_release() {
            if let Some(port) = payments.as_deref_mut() {
                port.release_payment(appointment_id)
                    .map_err(|e| PersistenceError::PaymentReleaseAborted(e.to_string()))?;
            }
        }

        debug!(
            appointment_id,
            event_id,
            action = %result.audit_event.action.name,
            "Committed appointment transition"
        );
        Ok(event_id)
    })
}
