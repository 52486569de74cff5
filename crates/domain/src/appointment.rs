// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::appointment_status::AppointmentStatus;
use crate::payment_status::PaymentStatus;
use crate::price::Price;
use crate::types::ReferenceCode;
use time::OffsetDateTime;

/// A scheduled session between a client and a practitioner.
///
/// The appointment is the central entity of the system. Its `status` and
/// `payment_status` fields move only through lifecycle transitions; no
/// code path writes them directly. Appointments are never hard-deleted:
/// cancellation is a terminal status, preserving the audit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// The canonical identifier assigned by the store.
    /// `None` indicates the appointment has not been persisted yet.
    appointment_id: Option<i64>,
    /// Human-readable short code for support reference.
    pub reference_code: ReferenceCode,
    /// The paying account holder.
    pub client_id: i64,
    /// The assigned practitioner.
    pub practitioner_id: i64,
    /// The person actually served, when distinct from the client.
    pub beneficiary_id: Option<i64>,
    /// The booked service.
    pub service_id: i64,
    /// The service's published list price at booking time.
    pub list_price: Price,
    /// Practitioner-specific override price in cents, if any.
    /// Never below the list price when the list price is a literal amount.
    pub custom_price_cents: Option<i64>,
    /// The lifecycle status.
    pub status: AppointmentStatus,
    /// The payment status; moves only as a transition side effect.
    pub payment_status: PaymentStatus,
    /// Scheduled session start.
    pub start_time: OffsetDateTime,
    /// Scheduled session end.
    pub end_time: OffsetDateTime,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Video meeting link for remote sessions.
    pub meeting_link: Option<String>,
    /// The client's problem description, set when the appointment is contested.
    pub problem_description: Option<String>,
    /// Whether this appointment has ever been contested. Set at most once,
    /// never cleared, so re-contestation can be refused.
    pub contested: bool,
}

impl Appointment {
    /// Creates a new appointment without a persisted ID, in `pending` status
    /// with no payment captured.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        reference_code: ReferenceCode,
        client_id: i64,
        practitioner_id: i64,
        beneficiary_id: Option<i64>,
        service_id: i64,
        list_price: Price,
        custom_price_cents: Option<i64>,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
    ) -> Self {
        Self {
            appointment_id: None,
            reference_code,
            client_id,
            practitioner_id,
            beneficiary_id,
            service_id,
            list_price,
            custom_price_cents,
            status: AppointmentStatus::Pending,
            payment_status: PaymentStatus::Pending,
            start_time,
            end_time,
            notes: None,
            meeting_link: None,
            problem_description: None,
            contested: false,
        }
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub const fn with_id(mut self, appointment_id: i64) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    /// Returns the canonical identifier if persisted.
    #[must_use]
    pub const fn appointment_id(&self) -> Option<i64> {
        self.appointment_id
    }

    /// The price actually billed: the practitioner override when set,
    /// otherwise the service list price.
    #[must_use]
    pub const fn effective_price(&self) -> Price {
        match self.custom_price_cents {
            Some(cents) => Price::Amount(cents),
            None => self.list_price,
        }
    }
}
