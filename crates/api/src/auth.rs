// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authenticated actor identity.
//!
//! Authentication mechanics (sessions, credentials) are out of scope;
//! callers present an already-authenticated identity, and every handler
//! threads it explicitly into the core. The core never reads an ambient
//! "current user".

use kairos_domain::{ActorRef, Role};

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor's canonical identifier.
    pub id: i64,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The actor's canonical identifier
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this actor into the reference the core operates on.
    #[must_use]
    pub const fn to_actor_ref(&self) -> ActorRef {
        ActorRef::new(self.id, self.role)
    }
}
