//! Pagination cursor codec.
//!
//! A cursor is the decimal `id` of the last article of the previous page.
//! The empty string means "start from the newest article".

use crate::DbError;

/// Decode a request cursor.
///
/// Returns `Ok(None)` for the empty cursor and `DbError::BadInput` for
/// anything that is not a positive 64-bit integer.
pub fn decode_cursor(cursor: &str) -> Result<Option<i64>, DbError> {
    if cursor.is_empty() {
        return Ok(None);
    }

    match cursor.parse::<i64>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(DbError::BadInput(format!("invalid cursor '{cursor}'"))),
    }
}

pub fn encode_cursor(id: i64) -> String {
    id.to_string()
}

/// Compute the cursor handed back with a page: the last item's id, or the
/// request cursor when the page is empty.
pub fn next_cursor(request_cursor: &str, last_id: Option<i64>) -> String {
    match last_id {
        Some(id) => encode_cursor(id),
        None => request_cursor.to_owned(),
    }
}
