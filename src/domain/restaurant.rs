//! Restaurant records as they live in `restaurants.json`.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One restaurant entry with its nested comments.
///
/// Only the keys the board reasons about are typed; everything else a
/// submitter sent is kept in `extra` and written back untouched.
///
/// Typed keys read leniently: older documents hold whatever was posted, so a
/// `null` or numeric value must not make the record unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub city: String,
    #[serde(
        default,
        deserialize_with = "text_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "readable_comments")]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
    /// Display string only; never parsed back.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Comment {
    pub fn new(text: impl Into<String>, at: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            date: display_timestamp(&at),
            extra: Map::new(),
        }
    }
}

/// Text form of a scalar: strings as-is, numbers and booleans printed.
/// `null`, arrays and objects have none.
pub fn scalar_text(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s),
        v @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Some(v.to_string()),
        _ => None,
    }
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(JsonValue::deserialize(deserializer)?).unwrap_or_default())
}

fn text_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(JsonValue::deserialize(deserializer)?))
}

/// Comment lists keep every entry that can be read; a bare string becomes the
/// comment text.
fn readable_comments<'de, D>(deserializer: D) -> Result<Vec<Comment>, D::Error>
where
    D: Deserializer<'de>,
{
    let JsonValue::Array(items) = JsonValue::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            JsonValue::Object(_) => serde_json::from_value(item).ok(),
            other => scalar_text(other).map(|text| Comment {
                text,
                date: String::new(),
                extra: Map::new(),
            }),
        })
        .collect())
}

/// Formats a timestamp the way the pages show it, e.g. `2024/3/7 14:05:09`.
pub fn display_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y/%-m/%-d %H:%M:%S").to_string()
}

/// Millisecond-clock id allocation.
///
/// Returns `now` in epoch milliseconds unless an existing numeric id is at or
/// past it, in which case the result is one past the largest existing id.
pub fn next_id<I>(existing: I, now: DateTime<Utc>) -> i64
where
    I: IntoIterator<Item = i64>,
{
    let now_ms = now.timestamp_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now_ms => max + 1,
        _ => now_ms,
    }
}

impl Restaurant {
    /// Numeric value of the id, for records created by this service.
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}
