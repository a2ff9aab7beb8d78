//! Core domain logic for Glassday, a glass/rubber daily planner.
//! This crate is the single source of truth for the day flow invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, LogLevel};
pub use logging::{init_from_config, init_logging, logging_status};
pub use model::day::{day_key, Clock, DayRecord, DayState, Energy, FixedClock, Stage, SystemClock};
pub use model::item::{
    IdGenerator, Item, ItemId, ItemType, Position, SequentialIdGenerator, UuidIdGenerator,
};
pub use repo::day_repo::{
    DayRepository, KvDayRepository, DAY_RECORD_KEY, INTRO_SEEN_KEY, RECENTS_KEY,
};
pub use service::capacity::{limit, status_at, Capacity, GlassStatus};
pub use service::day_machine::{
    BalanceView, DayStateMachine, DayView, DumpView, FlowSettings, GlassEntry, LockedView,
    ResetOutcome, SelectView, TransitionError, Trigger,
};
pub use service::item_store::ItemStore;
pub use service::layout::{Layout, RandomLayout};
pub use service::recency::{merge_recents, visible_recents, RECENTS_CAP};
pub use service::session::{default_item_store, open_session, SqliteDaySession};
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
