//! Day repository contract and key-value implementation.
//!
//! # Responsibility
//! - Load/save/clear the single current-day record.
//! - Persist the recency list and the one-time intro flag.
//!
//! # Invariants
//! - Unparseable JSON or an unexpected shape is treated as absent.
//! - Write failures are logged and swallowed; in-memory state stays
//!   authoritative for the session.
//! - Item text never appears in log lines.

use crate::model::day::DayRecord;
use crate::store::KvStore;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key of the locked day record.
pub const DAY_RECORD_KEY: &str = "glass-rubber-data";
/// Storage key of the recency list.
pub const RECENTS_KEY: &str = "glass-rubber-recents";
/// Storage key of the intro-seen marker.
pub const INTRO_SEEN_KEY: &str = "glass-rubber-intro-seen";

const INTRO_SEEN_VALUE: &str = "true";

/// Persistence contract injected into the day state machine.
pub trait DayRepository: Send {
    /// Returns the stored day record, whatever its date.
    fn load(&self) -> Option<DayRecord>;
    fn save(&mut self, record: &DayRecord);
    fn clear(&mut self);

    /// Returns the stored recency list, most-recent-first.
    fn load_recents(&self) -> Vec<String>;
    fn save_recents(&mut self, recents: &[String]);

    fn intro_seen(&self) -> bool;
    fn mark_intro_seen(&mut self);
}

/// `DayRepository` persisted through any `KvStore`.
pub struct KvDayRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> KvDayRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                error!("event=kv_read module=repo status=error key={key} error={err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=kv_read module=repo status=malformed key={key} line={} column={}",
                    err.line(),
                    err.column()
                );
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!("event=kv_write module=repo status=error key={key} error={err}");
                return;
            }
        };
        self.write_raw(key, &encoded);
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            error!("event=kv_write module=repo status=error key={key} error={err}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            error!("event=kv_remove module=repo status=error key={key} error={err}");
        }
    }
}

impl<S: KvStore> DayRepository for KvDayRepository<S> {
    fn load(&self) -> Option<DayRecord> {
        self.read_json(DAY_RECORD_KEY)
    }

    fn save(&mut self, record: &DayRecord) {
        self.write_json(DAY_RECORD_KEY, record);
    }

    fn clear(&mut self) {
        self.remove(DAY_RECORD_KEY);
    }

    fn load_recents(&self) -> Vec<String> {
        self.read_json::<Vec<String>>(RECENTS_KEY)
            .unwrap_or_default()
    }

    fn save_recents(&mut self, recents: &[String]) {
        self.write_json(RECENTS_KEY, recents);
    }

    fn intro_seen(&self) -> bool {
        match self.store.get(INTRO_SEEN_KEY) {
            Ok(value) => value.is_some(),
            Err(err) => {
                error!("event=kv_read module=repo status=error key={INTRO_SEEN_KEY} error={err}");
                false
            }
        }
    }

    fn mark_intro_seen(&mut self) {
        self.write_raw(INTRO_SEEN_KEY, INTRO_SEEN_VALUE);
    }
}

#[cfg(test)]
mod tests {
    use super::{DayRepository, KvDayRepository, DAY_RECORD_KEY, INTRO_SEEN_KEY, RECENTS_KEY};
    use crate::model::day::DayRecord;
    use crate::model::item::{Item, ItemId};
    use crate::store::MemoryKvStore;

    #[test]
    fn malformed_record_is_absent() {
        let repo = KvDayRepository::new(MemoryKvStore::with_entries([(
            DAY_RECORD_KEY,
            "{not json",
        )]));
        assert!(repo.load().is_none());
    }

    #[test]
    fn unexpected_shape_is_absent() {
        let repo = KvDayRepository::new(MemoryKvStore::with_entries([
            (DAY_RECORD_KEY, r#"{"date":"x","state":"locked","data":"nope"}"#),
            (RECENTS_KEY, r#"{"a":1}"#),
        ]));
        assert!(repo.load().is_none());
        assert!(repo.load_recents().is_empty());
    }

    #[test]
    fn record_roundtrip_and_clear() {
        let mut repo = KvDayRepository::new(MemoryKvStore::new());
        let record = DayRecord::locked(
            "Sun Oct 18 2026",
            vec![Item::new(ItemId::new("a"), "Call mom")],
        );

        repo.save(&record);
        assert_eq!(repo.load(), Some(record));

        repo.clear();
        assert!(repo.load().is_none());
        assert!(!repo.store().contains_key(DAY_RECORD_KEY));
    }

    #[test]
    fn intro_flag_is_stored_as_true_string() {
        let mut repo = KvDayRepository::new(MemoryKvStore::new());
        assert!(!repo.intro_seen());
        repo.mark_intro_seen();
        assert!(repo.intro_seen());
        assert_eq!(repo.store().raw(INTRO_SEEN_KEY), Some("true"));
    }
}
