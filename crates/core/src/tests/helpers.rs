// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for core transition tests.

use kairos_audit::Cause;
use kairos_domain::{
    ActorRef, Appointment, AppointmentStatus, PaymentStatus, Price, ReferenceCode, Role,
};
use time::OffsetDateTime;
use time::macros::datetime;

/// Fixed "current time" for deterministic precondition checks.
/// The fixture appointment is scheduled the day before.
pub const NOW: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

/// Client account used by the fixture appointment.
pub const CLIENT_ID: i64 = 10;
/// Practitioner assigned to the fixture appointment.
pub const PRACTITIONER_ID: i64 = 20;

/// Builds a persisted appointment in the given lifecycle position.
pub fn appointment_in(status: AppointmentStatus, payment_status: PaymentStatus) -> Appointment {
    let mut appointment: Appointment = Appointment::new(
        ReferenceCode::new("APT-TEST01"),
        CLIENT_ID,
        PRACTITIONER_ID,
        None,
        3,
        Price::Amount(15000),
        None,
        datetime!(2026-03-01 10:00 UTC),
        datetime!(2026-03-01 11:00 UTC),
    )
    .with_id(1);
    appointment.status = status;
    appointment.payment_status = payment_status;
    appointment
}

/// The fixture appointment's client.
pub const fn client() -> ActorRef {
    ActorRef::new(CLIENT_ID, Role::Client)
}

/// The fixture appointment's assigned practitioner.
pub const fn practitioner() -> ActorRef {
    ActorRef::new(PRACTITIONER_ID, Role::Practitioner)
}

/// A staff actor.
pub const fn admin() -> ActorRef {
    ActorRef::new(1, Role::Admin)
}

/// A client who is not a party to the fixture appointment.
pub const fn other_client() -> ActorRef {
    ActorRef::new(99, Role::Client)
}

/// A practitioner who is not assigned to the fixture appointment.
pub const fn other_practitioner() -> ActorRef {
    ActorRef::new(88, Role::Practitioner)
}

/// A throwaway cause for tests.
pub fn test_cause() -> Cause {
    Cause::new(String::from("req-test"), String::from("Test request"))
}
