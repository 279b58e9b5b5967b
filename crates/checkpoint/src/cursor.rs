//! Resume cursor for day-windowed report streams.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The most recent day whose records were emitted for one
/// (account, stream) pair. A resumed run starts at this day again.
///
/// Serialized as `YYYY-MM-DDT00:00:00Z`. Any RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date is accepted when loading previously stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(NaiveDate);

impl Cursor {
    pub fn new(day: NaiveDate) -> Self {
        Self(day)
    }

    pub fn day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Cursor {
    fn from(day: NaiveDate) -> Self {
        Self(day)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T00:00:00Z", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Cursor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.date_naive()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| anyhow::anyhow!("Invalid cursor '{s}': {e}"))
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Key under which a stream's cursor is stored for one account.
pub fn state_key(stream: &str, account_id: &str) -> String {
    format!("{stream}_{account_id}")
}
