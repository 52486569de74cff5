// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation rules.
//!
//! These checks run at write time, before any state transition logic.

use crate::error::DomainError;
use crate::price::Price;
use time::OffsetDateTime;

/// Validates a practitioner override price against the service list price.
///
/// The override must be at least the list price. A quote-on-request list
/// price is excluded from the floor check entirely.
///
/// # Errors
///
/// Returns `DomainError::CustomPriceBelowListPrice` if the override is
/// below a literal list price.
pub const fn validate_custom_price(
    custom_price_cents: i64,
    list_price: &Price,
) -> Result<(), DomainError> {
    match list_price.as_cents() {
        Some(list_cents) if custom_price_cents < list_cents => {
            Err(DomainError::CustomPriceBelowListPrice {
                custom_cents: custom_price_cents,
                list_cents,
            })
        }
        _ => Ok(()),
    }
}

/// Validates a problem-report description.
///
/// # Errors
///
/// Returns `DomainError::EmptyProblemDescription` if the description is
/// empty or whitespace-only.
pub fn validate_problem_description(description: &str) -> Result<(), DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::EmptyProblemDescription);
    }
    Ok(())
}

/// Validates that an appointment's scheduled end comes after its start.
///
/// # Errors
///
/// Returns `DomainError::InvalidSchedule` if the end is not after the start.
pub fn validate_schedule(
    start_time: OffsetDateTime,
    end_time: OffsetDateTime,
) -> Result<(), DomainError> {
    if end_time <= start_time {
        return Err(DomainError::InvalidSchedule {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        });
    }
    Ok(())
}
