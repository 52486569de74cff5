// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment record projection.
//!
//! A pure read transform: joins an appointment with its client,
//! practitioner, service, and beneficiary, with field-level redaction of
//! the beneficiary's birth and contact data. No side effects, no
//! mutation rights.

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::auth::AuthenticatedActor;
use crate::error::{ApiError, map_persistence_error, translate_core_error};
use crate::request_response::{AppointmentRecord, BeneficiaryInfo, PartyInfo, ServiceInfo};
use kairos::{can_view, ensure_can_view};
use kairos_domain::{Appointment, Beneficiary, Client, Practitioner, ServiceOffering};
use kairos_persistence::SqliteStore;

/// Formats a timestamp for API responses.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

/// Assembles the full appointment record for a requesting actor.
///
/// # Arguments
///
/// * `store` - The persistence layer
/// * `appointment_id` - The appointment to read
/// * `actor` - The requesting actor
///
/// # Errors
///
/// Returns an error if:
/// - The appointment (or a joined record) does not exist
/// - The actor fails the view check for this appointment
pub fn get_appointment_record(
    store: &mut SqliteStore,
    appointment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<AppointmentRecord, ApiError> {
    let appointment: Appointment = store
        .get_appointment(appointment_id)
        .map_err(map_persistence_error)?;

    ensure_can_view(&actor.to_actor_ref(), &appointment).map_err(translate_core_error)?;

    let client: Client = store
        .get_client(appointment.client_id)
        .map_err(map_persistence_error)?;
    let practitioner: Practitioner = store
        .get_practitioner(appointment.practitioner_id)
        .map_err(map_persistence_error)?;
    let service: ServiceOffering = store
        .get_service(appointment.service_id)
        .map_err(map_persistence_error)?;
    let beneficiary: Option<Beneficiary> = match appointment.beneficiary_id {
        Some(beneficiary_id) => Some(
            store
                .get_beneficiary(beneficiary_id)
                .map_err(map_persistence_error)?,
        ),
        None => None,
    };

    build_record(
        &appointment,
        &client,
        &practitioner,
        &service,
        beneficiary.as_ref(),
        actor,
    )
}

/// Builds the record DTO, applying beneficiary field redaction.
fn build_record(
    appointment: &Appointment,
    client: &Client,
    practitioner: &Practitioner,
    service: &ServiceOffering,
    beneficiary: Option<&Beneficiary>,
    actor: &AuthenticatedActor,
) -> Result<AppointmentRecord, ApiError> {
    let appointment_id: i64 = appointment.appointment_id().ok_or_else(|| ApiError::Internal {
        message: String::from("Appointment record has no identifier"),
    })?;

    // Birth/contact fields only for actors who pass the view check
    let include_sensitive: bool = can_view(&actor.to_actor_ref(), appointment);

    let beneficiary_info: Option<BeneficiaryInfo> = beneficiary.map(|b| BeneficiaryInfo {
        beneficiary_id: b.beneficiary_id,
        full_name: b.full_name.clone(),
        birth_date: if include_sensitive {
            b.birth_date.clone()
        } else {
            None
        },
        email: if include_sensitive {
            b.email.clone()
        } else {
            None
        },
        phone: if include_sensitive {
            b.phone.clone()
        } else {
            None
        },
    });

    Ok(AppointmentRecord {
        appointment_id,
        reference_code: appointment.reference_code.value().to_string(),
        status: appointment.status.as_str().to_string(),
        payment_status: appointment.payment_status.as_str().to_string(),
        start_time: format_timestamp(appointment.start_time)?,
        end_time: format_timestamp(appointment.end_time)?,
        price_display: appointment.effective_price().to_string(),
        notes: appointment.notes.clone(),
        meeting_link: appointment.meeting_link.clone(),
        problem_description: appointment.problem_description.clone(),
        contested: appointment.contested,
        client: PartyInfo {
            id: client.client_id,
            full_name: client.full_name.clone(),
            email: client.email.clone(),
        },
        practitioner: PartyInfo {
            id: practitioner.practitioner_id,
            full_name: practitioner.full_name.clone(),
            email: practitioner.email.clone(),
        },
        service: ServiceInfo {
            service_id: service.service_id,
            name: service.name.clone(),
            price_display: service.list_price.to_string(),
        },
        beneficiary: beneficiary_info,
    })
}
