// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment booking mutations.
//!
//! Booking inserts the row; every later status change goes through
//! `transitions::commit_transition`.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::format_description::well_known::Iso8601;
use tracing::debug;

use crate::data_models::NewAppointment;
use crate::diesel_schema::appointments;
use crate::error::PersistenceError;
use crate::sqlite::last_insert_rowid;
use kairos_domain::Appointment;

/// Formats a timestamp for storage.
fn format_timestamp(value: time::OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Inserts a new appointment row and returns its assigned ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `appointment` - The appointment value (must not carry an ID yet)
/// * `created_at` - The booking timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the appointment already has an ID or the insert
/// fails (including a duplicate reference code).
pub fn insert_appointment(
    conn: &mut SqliteConnection,
    appointment: &Appointment,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    if appointment.appointment_id().is_some() {
        return Err(PersistenceError::Other(
            "New appointment must not carry an identifier".to_string(),
        ));
    }

    let record: NewAppointment = NewAppointment {
        reference_code: appointment.reference_code.value().to_string(),
        client_id: appointment.client_id,
        practitioner_id: appointment.practitioner_id,
        beneficiary_id: appointment.beneficiary_id,
        service_id: appointment.service_id,
        list_price_cents: appointment.list_price.as_cents(),
        custom_price_cents: appointment.custom_price_cents,
        status: appointment.status.as_str().to_string(),
        payment_status: appointment.payment_status.as_str().to_string(),
        start_time: format_timestamp(appointment.start_time)?,
        end_time: format_timestamp(appointment.end_time)?,
        notes: appointment.notes.clone(),
        meeting_link: appointment.meeting_link.clone(),
        contested: i32::from(appointment.contested),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    };

    diesel::insert_into(appointments::table)
        .values(&record)
        .execute(conn)?;

    let appointment_id: i64 = last_insert_rowid(conn)?;
    debug!(
        appointment_id,
        reference_code = appointment.reference_code.value(),
        "Inserted new appointment"
    );
    Ok(appointment_id)
}
