//! Production wiring of a day session over SQLite.

use crate::config::AppConfig;
use crate::model::day::SystemClock;
use crate::model::item::UuidIdGenerator;
use crate::repo::day_repo::KvDayRepository;
use crate::service::day_machine::{DayStateMachine, FlowSettings};
use crate::service::item_store::ItemStore;
use crate::service::layout::RandomLayout;
use crate::store::{SqliteKvStore, StoreResult};
use log::info;

/// Day state machine persisted in a SQLite key-value store.
pub type SqliteDaySession = DayStateMachine<KvDayRepository<SqliteKvStore>, SystemClock>;

/// Opens the configured database and resolves today's starting stage.
pub fn open_session(config: &AppConfig) -> StoreResult<SqliteDaySession> {
    let store = SqliteKvStore::open(&config.db_path)?;
    let session = DayStateMachine::with_settings(
        KvDayRepository::new(store),
        SystemClock,
        default_item_store(),
        FlowSettings {
            glass_warning_threshold: config.glass_warning_threshold,
        },
    );
    info!(
        "event=session_open module=service status=ok stage={}",
        session.stage()
    );
    Ok(session)
}

/// Item store with random UUID ids and random placement.
pub fn default_item_store() -> ItemStore {
    ItemStore::new(
        Box::new(UuidIdGenerator),
        Box::new(RandomLayout::from_entropy()),
    )
}
