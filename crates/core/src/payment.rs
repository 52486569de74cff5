// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment release port.
//!
//! Capturing funds from the client happens upstream, before an
//! appointment is confirmed. The only payment operation the core drives
//! is the *release* decision, and it must be atomic with the status
//! write: if the release fails, the appointment must not read as
//! validated.

use thiserror::Error;

/// Failure to release a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Payment release failed: {reason}")]
pub struct PaymentReleaseError {
    /// Why the release failed.
    pub reason: String,
}

impl PaymentReleaseError {
    /// Creates a new payment release error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Releases captured funds to the practitioner.
pub trait PaymentRelease {
    /// Releases the captured payment for the given appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the release could not be performed; the
    /// caller must abort the enclosing transition.
    fn release_payment(&mut self, appointment_id: i64) -> Result<(), PaymentReleaseError>;
}
