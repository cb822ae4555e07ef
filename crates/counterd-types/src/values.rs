//! Textual value adapters for Signal and Count endpoints.
//!
//! External readers and writers see UTF-8 text; drivers see typed values.
//! These adapters are the translation layer between the two.

use crate::{CounterError, CounterResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instantaneous level of a Signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLevel {
    Low,
    High,
}

impl SignalLevel {
    /// Returns the externally visible name for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl AsRef<str> for SignalLevel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A Count value reported by a driver, rendered as decimal text.
///
/// The driver chooses whether the accumulator position is interpreted as
/// unsigned or signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountValue {
    Unsigned(u64),
    Signed(i64),
}

impl fmt::Display for CountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
        }
    }
}

/// A textual Count write payload as delivered by an external writer.
///
/// The driver extracts the value in the representation it needs; parsing
/// accepts surrounding whitespace and a `0x`/`0X` prefix for hexadecimal.
#[derive(Debug, Clone, Copy)]
pub struct CountWriteValue<'a> {
    raw: &'a str,
}

impl<'a> CountWriteValue<'a> {
    /// Wraps a raw write payload.
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Returns the raw payload text.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parses the payload as an unsigned count position.
    pub fn to_unsigned(&self) -> CounterResult<u64> {
        let s = self.raw.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        };
        parsed.map_err(|_| CounterError::invalid_value(format!("not an unsigned count: {s:?}")))
    }

    /// Parses the payload as a signed count position.
    pub fn to_signed(&self) -> CounterResult<i64> {
        let s = self.raw.trim();
        let (negative, magnitude) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let parsed = match magnitude
            .strip_prefix("0x")
            .or_else(|| magnitude.strip_prefix("0X"))
        {
            Some(hex) => i64::from_str_radix(hex, 16).map(|v| if negative { -v } else { v }),
            None => s.parse::<i64>(),
        };
        parsed.map_err(|_| CounterError::invalid_value(format!("not a signed count: {s:?}")))
    }
}
