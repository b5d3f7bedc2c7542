//! Wall-clock helpers.
//!
//! Clients send times as `HH:MM` or `HH:MM:SS`; Postgres `TIME` columns come
//! back as `HH:MM:SS`. The serde adapters here accept either form and always
//! emit the long one.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const LONG_FORMAT: &str = "%H:%M:%S";
const SHORT_FORMAT: &str = "%H:%M";

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, LONG_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, SHORT_FORMAT))
        .ok()
}

pub fn format_wall_clock(time: &NaiveTime) -> String {
    time.format(LONG_FORMAT).to_string()
}

/// Half-open overlap test: `[a_start, a_end)` against `[b_start, b_end)`.
///
/// Ranges that only touch (one ends where the other starts) do not overlap.
pub fn ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Serde adapter for `NaiveTime` fields, used with `#[serde(with = "...")]`.
pub mod wall_clock {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_wall_clock(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_wall_clock(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time '{}', expected HH:MM or HH:MM:SS", raw))
        })
    }
}

/// Same as [`wall_clock`] for optional fields.
pub mod wall_clock_opt {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.serialize_some(&format_wall_clock(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_wall_clock(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid time '{}', expected HH:MM or HH:MM:SS",
                    raw
                ))
            }),
            None => Ok(None),
        }
    }
}
