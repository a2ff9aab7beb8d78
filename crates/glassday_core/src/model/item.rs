//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical captured thought with its classification.
//! - Provide injectable id generation for new items.
//!
//! # Invariants
//! - `id` is stable and never reused within one day record.
//! - `text` is non-empty after trim and never changes after creation.
//! - `kind` defaults to `Rubber` on creation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque item identifier.
///
/// Kept as a plain string so records written by older clients (short random
/// tokens) load unchanged next to UUID-based ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fragility classification of a captured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Must not be dropped; competes for the day's capacity.
    Glass,
    /// Can bounce to another day; stored but never prioritized.
    #[default]
    Rubber,
}

impl ItemType {
    /// Returns the other classification.
    pub fn toggled(self) -> Self {
        match self {
            Self::Glass => Self::Rubber,
            Self::Rubber => Self::Glass,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Rubber => "rubber",
        }
    }
}

/// Screen placement attached by the layout collaborator.
///
/// `top`/`left` are percentages of the viewport and serialize as `"NN%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(with = "percent")]
    pub top: u8,
    #[serde(with = "percent")]
    pub left: u8,
    pub rotation: i8,
}

/// One captured thought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    /// Serialized as `type` to match the stored record schema.
    #[serde(rename = "type", default)]
    pub kind: ItemType,
    /// Smallest keep-safe action. Only meaningful for glass items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Weak check state. Only meaningful once the day is locked.
    #[serde(default)]
    pub handled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Position>,
}

impl Item {
    /// Creates a rubber item with no action and no placement.
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            kind: ItemType::Rubber,
            action: None,
            handled: false,
            pos: None,
        }
    }

    pub fn is_glass(&self) -> bool {
        self.kind == ItemType::Glass
    }

    /// Returns whether this item carries a non-empty action.
    ///
    /// An empty action string counts as "no action yet".
    pub fn has_action(&self) -> bool {
        self.action.as_deref().is_some_and(|action| !action.is_empty())
    }
}

/// Source of fresh item ids.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> ItemId;
}

/// Random UUID v4 ids for production sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> ItemId {
        ItemId(Uuid::new_v4().simple().to_string())
    }
}

/// Monotonic `item-N` ids for deterministic tests and replays.
#[derive(Debug, Default, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> ItemId {
        self.next += 1;
        ItemId(format!("item-{}", self.next))
    }
}

mod percent {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value}%"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let number = raw
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("invalid percentage `{raw}`")))?;
        if !(0.0..=100.0).contains(&number) {
            return Err(D::Error::custom(format!("percentage out of range `{raw}`")));
        }
        Ok(number.round() as u8)
    }
}
