// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use crate::SqliteStore;
use kairos::{Command, PaymentRelease, PaymentReleaseError, TransitionResult, apply};
use kairos_audit::Cause;
use kairos_domain::{
    ActorRef, Appointment, AppointmentStatus, Price, ReferenceCode, Role,
};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use time::macros::datetime;

/// Fixed "current time" for deterministic transitions; the fixture
/// appointment is scheduled the day before.
pub const NOW: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

/// Seeded party and service identifiers.
pub struct Seeded {
    pub client_id: i64,
    pub practitioner_id: i64,
    pub service_id: i64,
    pub beneficiary_id: i64,
}

/// A payment release double that records calls and can be told to fail.
pub struct FakePayments {
    pub fail: bool,
    pub released: Vec<i64>,
}

impl FakePayments {
    pub const fn new() -> Self {
        Self {
            fail: false,
            released: Vec::new(),
        }
    }

    pub const fn failing() -> Self {
        Self {
            fail: true,
            released: Vec::new(),
        }
    }
}

impl PaymentRelease for FakePayments {
    fn release_payment(&mut self, appointment_id: i64) -> Result<(), PaymentReleaseError> {
        if self.fail {
            return Err(PaymentReleaseError::new("gateway unavailable"));
        }
        self.released.push(appointment_id);
        Ok(())
    }
}

/// Formats the fixed test time for storage.
pub fn occurred_at() -> String {
    NOW.format(&Iso8601::DEFAULT).expect("formattable timestamp")
}

/// Creates a store seeded with one client, practitioner, service, and
/// beneficiary.
pub fn seeded_store() -> (SqliteStore, Seeded) {
    let mut store = SqliteStore::new_in_memory().expect("Failed to create in-memory store");

    let client_id = store
        .create_client("Maya Laurent", "maya@example.com")
        .expect("Failed to create client");
    let practitioner_id = store
        .create_practitioner("Iris Beaumont", "iris@example.com")
        .expect("Failed to create practitioner");
    let service_id = store
        .create_service("Birth chart reading", Some(15000))
        .expect("Failed to create service");
    let beneficiary_id = store
        .create_beneficiary(
            client_id,
            "Theo Laurent",
            Some("1994-07-12"),
            None,
            Some("+33 6 00 00 00 00"),
        )
        .expect("Failed to create beneficiary");

    (
        store,
        Seeded {
            client_id,
            practitioner_id,
            service_id,
            beneficiary_id,
        },
    )
}

/// Books a pending appointment against the seeded parties.
pub fn book_appointment(store: &mut SqliteStore, seeded: &Seeded) -> i64 {
    let appointment = Appointment::new(
        ReferenceCode::new("APT-SEED01"),
        seeded.client_id,
        seeded.practitioner_id,
        Some(seeded.beneficiary_id),
        seeded.service_id,
        Price::Amount(15000),
        None,
        datetime!(2026-03-01 10:00 UTC),
        datetime!(2026-03-01 11:00 UTC),
    );
    store
        .create_appointment(&appointment, &occurred_at())
        .expect("Failed to create appointment")
}

/// Applies a command to the stored appointment and commits the result.
pub fn advance(
    store: &mut SqliteStore,
    appointment_id: i64,
    command: Command,
    actor: &ActorRef,
    payments: Option<&mut dyn PaymentRelease>,
) -> i64 {
    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    let result: TransitionResult = apply(
        &appointment,
        command,
        actor,
        Cause::new(String::from("req-test"), String::from("Test request")),
        NOW,
    )
    .expect("Transition should apply");
    store
        .commit_transition(appointment.status, &result, &occurred_at(), payments)
        .expect("Transition should commit")
}

/// Walks a stored appointment from `pending` to `completed`.
pub fn advance_to_completed(store: &mut SqliteStore, appointment_id: i64, seeded: &Seeded) {
    advance(
        store,
        appointment_id,
        Command::ConfirmPayment,
        &ActorRef::new(1, Role::Admin),
        None,
    );
    advance(
        store,
        appointment_id,
        Command::MarkCompleted,
        &ActorRef::new(seeded.practitioner_id, Role::Practitioner),
        None,
    );

    let appointment = store
        .get_appointment(appointment_id)
        .expect("Appointment should exist");
    assert_eq!(appointment.status, AppointmentStatus::Completed);
}
