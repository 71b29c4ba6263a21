//! Accepting new restaurant submissions.
//!
//! Two submissions are the same place when their normalized name and
//! normalized address both match. Same name at a different address is a
//! separate branch and is accepted.

use crate::domain::normalize::{normalize_address, normalize_text};
use crate::domain::restaurant::{next_id, scalar_text, Restaurant};
use crate::error::BoardError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

pub const MISSING_FIELDS_MESSAGE: &str = "請至少填寫「餐廳名稱」與「地址」";

/// Keys the server assigns; submitted values for these are dropped.
const RESERVED_KEYS: &[&str] = &["id", "comments"];

/// Validates `candidate` against `existing` and builds the new record.
///
/// Does not touch `existing` and performs no I/O; the caller appends and
/// persists the returned record.
pub fn submit(
    candidate: Map<String, JsonValue>,
    existing: &[Restaurant],
) -> Result<Restaurant, BoardError> {
    submit_at(candidate, existing, Utc::now())
}

pub fn submit_at(
    mut candidate: Map<String, JsonValue>,
    existing: &[Restaurant],
    now: DateTime<Utc>,
) -> Result<Restaurant, BoardError> {
    let name = required_text(&candidate, "name")?;
    let address = required_text(&candidate, "address")?;

    if is_duplicate(&name, &address, existing) {
        return Err(BoardError::Duplicate);
    }

    for key in RESERVED_KEYS.iter().chain(["name", "address"].iter()) {
        candidate.remove(*key);
    }
    let city = take_string(&mut candidate, "city").unwrap_or_default();
    let region = take_string(&mut candidate, "region");
    let district = take_string(&mut candidate, "district");

    let id = next_id(existing.iter().filter_map(Restaurant::numeric_id), now);

    Ok(Restaurant {
        id: id.to_string(),
        name,
        address,
        city,
        region,
        district,
        comments: Vec::new(),
        extra: candidate,
    })
}

/// True when some existing record has the same normalized name and address.
pub fn is_duplicate(name: &str, address: &str, existing: &[Restaurant]) -> bool {
    let n_name = normalize_text(name);
    let n_addr = normalize_address(address);
    existing
        .iter()
        .any(|r| normalize_text(&r.name) == n_name && normalize_address(&r.address) == n_addr)
}

fn required_text(candidate: &Map<String, JsonValue>, key: &str) -> Result<String, BoardError> {
    match candidate.get(key).and_then(JsonValue::as_str).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(BoardError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
    }
}

/// Moves `key` out of the opaque fields into its typed form.
fn take_string(candidate: &mut Map<String, JsonValue>, key: &str) -> Option<String> {
    candidate.remove(key).and_then(scalar_text)
}
