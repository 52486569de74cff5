// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference code generation.

use kairos_domain::ReferenceCode;

/// Characters used in reference codes. Ambiguous glyphs (0/O, 1/I/L)
/// are excluded so codes survive being read over the phone.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of the random portion of a reference code.
const CODE_LENGTH: usize = 6;

/// Generates a fresh human-readable appointment reference code.
///
/// Uniqueness is enforced by the store's unique index; the space is
/// large enough that collisions are a retry, not a design concern.
#[must_use]
pub fn generate_reference_code() -> ReferenceCode {
    let mut code: String = String::with_capacity(CODE_LENGTH + 4);
    code.push_str("APT-");
    for _ in 0..CODE_LENGTH {
        let index: usize = rand::random_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[index]));
    }
    ReferenceCode::new(&code)
}
