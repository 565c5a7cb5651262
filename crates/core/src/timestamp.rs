//! RFC 3339 serde helpers for contract timestamps.
//!
//! Open-ended periods (a current state, a contract without an end date)
//! carry no end timestamp. Older ledger records encode "no end" as the
//! zero time `0001-01-01T00:00:00Z`; these decode to `None` alongside
//! `null` and a missing field.

use serde::{Deserializer, Serializer};
use time::OffsetDateTime;

/// Unix timestamp of `0001-01-01T00:00:00Z`.
const ZERO_TIME_UNIX: i64 = -62_135_596_800;

/// Returns true for the zero time used by legacy records as "unset".
pub fn is_zero_time(value: &OffsetDateTime) -> bool {
    value.unix_timestamp() == ZERO_TIME_UNIX
}

/// Current time in UTC.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Required timestamp, RFC 3339 encoded.
pub mod required {
    pub use time::serde::rfc3339::{deserialize, serialize};
}

/// Optional timestamp: `None` encodes as `null`.
pub mod optional {
    use super::*;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time::serde::rfc3339::option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = time::serde::rfc3339::option::deserialize(deserializer)?;
        Ok(value.filter(|t| !is_zero_time(t)))
    }
}
