// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Comment queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::CommentRow;
use crate::diesel_schema::comments;
use crate::error::PersistenceError;
use kairos_domain::{Comment, CommentKind, CommentVisibility, Role};

/// Rebuilds a domain comment from its stored row.
fn row_to_comment(row: CommentRow) -> Result<Comment, PersistenceError> {
    let author_role: Role = Role::from_str(&row.author_role)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    let visibility: CommentVisibility = CommentVisibility::from_str(&row.visibility)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;
    let kind: CommentKind = CommentKind::from_str(&row.kind)
        .map_err(|e| PersistenceError::Reconstruction(e.to_string()))?;

    Ok(Comment {
        comment_id: Some(row.comment_id),
        appointment_id: row.appointment_id,
        author_id: row.author_id,
        author_role,
        body: row.body,
        visibility,
        kind,
        created_at: row.created_at,
    })
}

/// Lists the comments on an appointment in creation order.
///
/// Staff-only comments are returned only when `include_staff_only` is
/// set; the caller decides that from the requesting actor's role.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be rebuilt.
pub fn list_comments(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    include_staff_only: bool,
) -> Result<Vec<Comment>, PersistenceError> {
    let mut query = comments::table
        .filter(comments::appointment_id.eq(appointment_id))
        .into_boxed();

    if !include_staff_only {
        query = query.filter(comments::visibility.eq(CommentVisibility::Public.as_str()));
    }

    let rows: Vec<CommentRow> = query
        .order(comments::comment_id.asc())
        .select(CommentRow::as_select())
        .load::<CommentRow>(conn)?;

    rows.into_iter().map(row_to_comment).collect()
}
