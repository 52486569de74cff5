// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Comment mutations.
//!
//! Comments are append-only. They are never updated; deletion is an
//! admin-only corrective action enforced at the API boundary.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::comments;
use crate::error::PersistenceError;
use crate::sqlite::last_insert_rowid;
use kairos::CommentDraft;
use kairos_domain::{CommentKind, CommentVisibility, Role};

/// Inserts a comment and returns its assigned ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `appointment_id` - The appointment the comment belongs to
/// * `author_id` / `author_role` - The comment author
/// * `body` - The comment text
/// * `visibility` / `kind` - Comment classification flags
/// * `created_at` - The creation timestamp (ISO 8601)
///
/// # Errors
///
/// Returns an error if the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_comment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    author_id: i64,
    author_role: Role,
    body: &str,
    visibility: CommentVisibility,
    kind: CommentKind,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(comments::table)
        .values((
            comments::appointment_id.eq(appointment_id),
            comments::author_id.eq(author_id),
            comments::author_role.eq(author_role.as_str()),
            comments::body.eq(body),
            comments::visibility.eq(visibility.as_str()),
            comments::kind.eq(kind.as_str()),
            comments::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let comment_id: i64 = last_insert_rowid(conn)?;
    debug!(comment_id, appointment_id, "Inserted comment");
    Ok(comment_id)
}

/// Inserts a comment from a transition draft, attributed to the
/// transition's timestamp.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_comment_draft(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    draft: &CommentDraft,
    occurred_at: &str,
) -> Result<i64, PersistenceError> {
    insert_comment(
        conn,
        appointment_id,
        draft.author_id,
        draft.author_role,
        &draft.body,
        draft.visibility,
        draft.kind,
        occurred_at,
    )
}

/// Deletes a comment.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such comment exists.
pub fn delete_comment(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(comments::table.filter(comments::comment_id.eq(comment_id)))
            .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Comment {comment_id} does not exist"
        )));
    }
    debug!(comment_id, "Deleted comment");
    Ok(())
}
