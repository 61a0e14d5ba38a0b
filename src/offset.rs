use crate::shifter::ShiftError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unités du champ « durée » de l'hôte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl DurationUnit {
    pub fn seconds(self) -> i64 {
        match self {
            DurationUnit::Seconds => 1,
            DurationUnit::Minutes => 60,
            DurationUnit::Hours => 3_600,
            DurationUnit::Days => 86_400,
            DurationUnit::Weeks => 604_800,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
            DurationUnit::Weeks => "weeks",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "" | "s" | "sec" | "secs" | "second" | "seconds" => Some(DurationUnit::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(DurationUnit::Minutes),
            "h" | "hour" | "hours" => Some(DurationUnit::Hours),
            "d" | "day" | "days" => Some(DurationUnit::Days),
            "w" | "week" | "weeks" => Some(DurationUnit::Weeks),
            _ => None,
        }
    }
}

/// Décalage signé appliqué aux dates attendues, en secondes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offset(i64);

impl Offset {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// `value` × `unit`, sans dépassement.
    pub fn new(value: i64, unit: DurationUnit) -> Result<Self, ShiftError> {
        value
            .checked_mul(unit.seconds())
            .map(Self)
            .ok_or_else(|| ShiftError::InvalidOffset(format!("{value} {} overflows", unit.label())))
    }

    pub fn seconds(self) -> i64 {
        self.0
    }

    /// Applique le décalage à un timestamp Unix.
    pub fn apply(self, ts: i64) -> Option<i64> {
        ts.checked_add(self.0)
    }
}

impl FromStr for Offset {
    type Err = ShiftError;

    /// Accepte `3600`, `90m`, `-2w`, `+3 days`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || ShiftError::InvalidOffset(s.to_string());
        let (negative, rest) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(invalid());
        }
        let value: i64 = rest[..digits_end].parse().map_err(|_| invalid())?;
        let unit = DurationUnit::parse(rest[digits_end..].trim()).ok_or_else(invalid)?;
        let value = if negative { -value } else { value };
        Offset::new(value, unit)
    }
}

impl fmt::Display for Offset {
    /// Plus grande unité exacte, signe explicite : `+3 days`, `-90 minutes`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let abs = self.0.unsigned_abs();
        let unit = [
            DurationUnit::Weeks,
            DurationUnit::Days,
            DurationUnit::Hours,
            DurationUnit::Minutes,
        ]
        .into_iter()
        .find(|u| abs != 0 && abs % u.seconds() as u64 == 0)
        .unwrap_or(DurationUnit::Seconds);
        write!(f, "{sign}{} {}", abs / unit.seconds() as u64, unit.label())
    }
}
