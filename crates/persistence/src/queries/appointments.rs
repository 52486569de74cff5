// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::data_models::AppointmentRow;
use crate::diesel_schema::appointments;
use crate::error::PersistenceError;
use kairos_domain::{
    Appointment, AppointmentStatus, PaymentStatus, Price, ReferenceCode,
};

/// Rebuilds a domain appointment from its stored row.
///
/// # Errors
///
/// Returns `PersistenceError::Reconstruction` if a stored status or
/// timestamp cannot be parsed.
pub fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, PersistenceError> {
    let status: AppointmentStatus = AppointmentStatus::from_str(&row.status)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    let payment_status: PaymentStatus = PaymentStatus::from_str(&row.payment_status)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    let start_time: OffsetDateTime = parse_timestamp(&row.start_time)?;
    let end_time: OffsetDateTime = parse_timestamp(&row.end_time)?;

    let mut appointment: Appointment = Appointment::new(
        ReferenceCode::new(&row.reference_code),
        row.client_id,
        row.practitioner_id,
        row.beneficiary_id,
        row.service_id,
        Price::from_cents(row.list_price_cents),
        row.custom_price_cents,
        start_time,
        end_time,
    )
    .with_id(row.appointment_id);

    appointment.status = status;
    appointment.payment_status = payment_status;
    appointment.notes = row.notes;
    appointment.meeting_link = row.meeting_link;
    appointment.problem_description = row.problem_description;
    appointment.contested = row.contested != 0;

    Ok(appointment)
}

/// Parses a stored ISO 8601 timestamp.
fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| {
        PersistenceError::Reconstruction(format!("invalid stored timestamp '{value}': {e}"))
    })
}

/// Retrieves an appointment by its canonical identifier.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `appointment_id` - The appointment's canonical identifier
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such appointment exists.
pub fn get_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Appointment, PersistenceError> {
    let row = appointments::table
        .filter(appointments::appointment_id.eq(appointment_id))
        .select(AppointmentRow::as_select())
        .first::<AppointmentRow>(conn);

    match row {
        Ok(row) => row_to_appointment(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Appointment {appointment_id} does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves an appointment by its human-readable reference code.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such appointment exists.
pub fn get_appointment_by_reference(
    conn: &mut SqliteConnection,
    reference_code: &str,
) -> Result<Appointment, PersistenceError> {
    let normalized: String = reference_code.to_uppercase();
    let row = appointments::table
        .filter(appointments::reference_code.eq(&normalized))
        .select(AppointmentRow::as_select())
        .first::<AppointmentRow>(conn);

    match row {
        Ok(row) => row_to_appointment(row),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Appointment with reference '{normalized}' does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
