// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use kairos::{NotificationKind, Notifier, PaymentRelease, PaymentReleaseError};
use kairos_audit::Cause;
use kairos_domain::Role;
use kairos_persistence::SqliteStore;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::auth::AuthenticatedActor;
use crate::handlers::TransitionPorts;
use crate::request_response::BookAppointmentRequest;
use crate::{book_appointment, confirm_payment, mark_completed};

/// Fixed "current time" for deterministic transitions; the fixture
/// appointment is scheduled the day before.
pub const NOW: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

/// A seeded store together with the identifiers booking needs.
pub struct TestEnv {
    pub store: SqliteStore,
    pub client_id: i64,
    pub practitioner_id: i64,
    pub service_id: i64,
    pub beneficiary_id: i64,
}

/// Creates a store seeded with one client, practitioner, priced
/// service, and beneficiary.
pub fn test_env() -> TestEnv {
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

    TestEnv {
        store,
        client_id,
        practitioner_id,
        service_id,
        beneficiary_id,
    }
}

pub const fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, Role::Admin)
}

pub const fn client_of(env: &TestEnv) -> AuthenticatedActor {
    AuthenticatedActor::new(env.client_id, Role::Client)
}

pub const fn practitioner_of(env: &TestEnv) -> AuthenticatedActor {
    AuthenticatedActor::new(env.practitioner_id, Role::Practitioner)
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
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

/// A notifier double that records every dispatched notification.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Role, i64, NotificationKind)>>,
}

impl RecordingNotifier {
    pub const fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_to(&self, recipient: Role) -> Vec<NotificationKind> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(role, _, _)| *role == recipient)
            .map(|(_, _, kind)| *kind)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: Role, appointment_id: i64, kind: NotificationKind) {
        self.sent
            .lock()
            .unwrap()
            .push((recipient, appointment_id, kind));
    }
}

/// Bundles the test doubles into the ports a handler takes.
pub fn ports<'a>(
    payments: &'a mut FakePayments,
    notifier: &'a RecordingNotifier,
) -> TransitionPorts<'a> {
    TransitionPorts {
        payments,
        notifier,
    }
}

/// A booking request against the seeded records, scheduled the day
/// before the fixed test time.
pub fn booking_request(env: &TestEnv) -> BookAppointmentRequest {
    BookAppointmentRequest {
        client_id: env.client_id,
        practitioner_id: env.practitioner_id,
        beneficiary_id: Some(env.beneficiary_id),
        service_id: env.service_id,
        custom_price_cents: None,
        start_time: String::from("2026-03-01T10:00:00Z"),
        end_time: String::from("2026-03-01T11:00:00Z"),
        notes: None,
        meeting_link: None,
    }
}

/// Books an appointment and returns its assigned ID.
pub fn book(env: &mut TestEnv) -> i64 {
    let request = booking_request(env);
    let actor = client_of(env);
    book_appointment(&mut env.store, request, &actor, NOW)
        .expect("Booking should succeed")
        .appointment_id
}

/// Walks a booked appointment to `completed` through the handlers.
pub fn advance_to_completed(env: &mut TestEnv, appointment_id: i64) {
    let mut payments = FakePayments::new();
    let notifier = RecordingNotifier::new();
    confirm_payment(
        &mut env.store,
        appointment_id,
        &admin(),
        test_cause(),
        NOW,
        ports(&mut payments, &notifier),
    )
    .expect("Payment confirmation should succeed");

    let mut payments = FakePayments::new();
    let practitioner = practitioner_of(env);
    mark_completed(
        &mut env.store,
        appointment_id,
        &practitioner,
        test_cause(),
        NOW,
        ports(&mut payments, &notifier),
    )
    .expect("Completion should succeed");
}
