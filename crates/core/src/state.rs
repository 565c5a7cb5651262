use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::timestamp;

/// Lifecycle phase of a contract.
///
/// Phases are ordered: a contract only ever moves forward through
/// `WAITING_FOR_SIGNATURE -> SIGNED -> WAITING_FOR_PAYMENT -> IN_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateHeading {
    WaitingForSignature,
    Signed,
    WaitingForPayment,
    InOrder,
}

impl StateHeading {
    pub const ALL: [StateHeading; 4] = [
        StateHeading::WaitingForSignature,
        StateHeading::Signed,
        StateHeading::WaitingForPayment,
        StateHeading::InOrder,
    ];

    /// Canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            StateHeading::WaitingForSignature => "WAITING_FOR_SIGNATURE",
            StateHeading::Signed => "SIGNED",
            StateHeading::WaitingForPayment => "WAITING_FOR_PAYMENT",
            StateHeading::InOrder => "IN_ORDER",
        }
    }

    /// Phase at position `n` of the lifecycle, as used by legacy integer
    /// encodings.
    pub fn from_ordinal(n: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(n).ok()?).copied()
    }
}

impl fmt::Display for StateHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateHeading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown state heading '{}'", s))
    }
}

impl Serialize for StateHeading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct HeadingVisitor;

impl<'de> Visitor<'de> for HeadingVisitor {
    type Value = StateHeading;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a state heading name or an ordinal between 0 and 3")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        StateHeading::from_ordinal(v)
            .ok_or_else(|| E::custom(format!("state heading ordinal {} out of range", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let n = u64::try_from(v)
            .map_err(|_| E::custom(format!("state heading ordinal {} out of range", v)))?;
        self.visit_u64(n)
    }
}

impl<'de> Deserialize<'de> for StateHeading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HeadingVisitor)
    }
}

/// One entry of a contract's state history.
///
/// The entry without an end timestamp is the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractState {
    pub heading: StateHeading,
    #[serde(with = "timestamp::required")]
    pub starting_date: OffsetDateTime,
    #[serde(default, with = "timestamp::optional")]
    pub ending_date: Option<OffsetDateTime>,
}

impl ContractState {
    /// An open state starting at `at`.
    pub fn open(heading: StateHeading, at: OffsetDateTime) -> Self {
        ContractState {
            heading,
            starting_date: at,
            ending_date: None,
        }
    }

    pub fn is_current(&self) -> bool {
        self.ending_date.is_none()
    }
}
