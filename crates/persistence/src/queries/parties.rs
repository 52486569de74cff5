// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Party and service lookups used by the appointment record projection.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{BeneficiaryRow, ClientRow, PractitionerRow, ServiceRow};
use crate::diesel_schema::{beneficiaries, clients, practitioners, services};
use crate::error::PersistenceError;
use kairos_domain::{Beneficiary, Client, Practitioner, Price, ServiceOffering};

/// Retrieves a client by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such client exists.
pub fn get_client(conn: &mut SqliteConnection, client_id: i64) -> Result<Client, PersistenceError> {
    let row = clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientRow::as_select())
        .first::<ClientRow>(conn);

    match row {
        Ok(row) => Ok(Client {
            client_id: row.client_id,
            full_name: row.full_name,
            email: row.email,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Client {client_id} does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a practitioner by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such practitioner exists.
pub fn get_practitioner(
    conn: &mut SqliteConnection,
    practitioner_id: i64,
) -> Result<Practitioner, PersistenceError> {
    let row = practitioners::table
        .filter(practitioners::practitioner_id.eq(practitioner_id))
        .select(PractitionerRow::as_select())
        .first::<PractitionerRow>(conn);

    match row {
        Ok(row) => Ok(Practitioner {
            practitioner_id: row.practitioner_id,
            full_name: row.full_name,
            email: row.email,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Practitioner {practitioner_id} does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a service offering by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such service exists.
pub fn get_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<ServiceOffering, PersistenceError> {
    let row = services::table
        .filter(services::service_id.eq(service_id))
        .select(ServiceRow::as_select())
        .first::<ServiceRow>(conn);

    match row {
        Ok(row) => Ok(ServiceOffering {
            service_id: row.service_id,
            name: row.name,
            list_price: Price::from_cents(row.list_price_cents),
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Service {service_id} does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a beneficiary by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such beneficiary exists.
pub fn get_beneficiary(
    conn: &mut SqliteConnection,
    beneficiary_id: i64,
) -> Result<Beneficiary, PersistenceError> {
    let row = beneficiaries::table
        .filter(beneficiaries::beneficiary_id.eq(beneficiary_id))
        .select(BeneficiaryRow::as_select())
        .first::<BeneficiaryRow>(conn);

    match row {
        Ok(row) => Ok(Beneficiary {
            beneficiary_id: row.beneficiary_id,
            client_id: row.client_id,
            full_name: row.full_name,
            birth_date: row.birth_date,
            email: row.email,
            phone: row.phone,
        }),
        Err(diesel::result::Error::NotFound) => Err(PersistenceError::NotFound(format!(
            "Beneficiary {beneficiary_id} does not exist"
        ))),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
