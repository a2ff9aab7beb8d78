//! Day-level model: flow stages, energy, and the persisted day record.
//!
//! # Responsibility
//! - Define the closed set of stages a planning session moves through.
//! - Define the locked day record written to storage.
//! - Provide the calendar-day key and an injectable clock.
//!
//! # Invariants
//! - Only locked days are persisted; unlocked days are session-only.
//! - Day keys compare by string equality, never chronologically.

use super::item::Item;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// `chrono` format matching the stored `date` field, e.g. `Sun Oct 18 2026`.
pub const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Stage of the daily planning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Free capture of thoughts.
    Dump,
    /// Glass/rubber classification.
    Select,
    /// One-time explanation overlay.
    Explain,
    /// Energy check, prioritization and actions.
    Balance,
    /// Read-only checklist for the rest of the day.
    Locked,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dump => "dump",
            Self::Select => "select",
            Self::Explain => "explain",
            Self::Balance => "balance",
            Self::Locked => "locked",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported energy for the day. "Unset" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Energy {
    Low,
    Medium,
    High,
}

impl Energy {
    pub const ALL: [Energy; 3] = [Energy::Low, Energy::Medium, Energy::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a case-insensitive energy name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Persisted lifecycle marker. Locked is the only storable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayState {
    Locked,
}

/// Locked day stored under the day-record key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    pub state: DayState,
    /// Full item sequence at lock time, serialized as `data`.
    #[serde(rename = "data")]
    pub items: Vec<Item>,
}

impl DayRecord {
    pub fn locked(date: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            date: date.into(),
            state: DayState::Locked,
            items,
        }
    }

    /// Returns whether this record can be resumed on `today`.
    pub fn is_resumable_on(&self, today: &str) -> bool {
        self.state == DayState::Locked && self.date == today
    }
}

/// Formats a calendar date as a stored day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Source of the current calendar day.
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
