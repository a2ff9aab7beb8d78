use chrono::NaiveDate;
use glassday_core::{
    DayStateMachine, DayView, Energy, FixedClock, ItemStore, KvDayRepository, KvStore,
    RandomLayout, SequentialIdGenerator, Stage, StoreError, StoreResult,
};

/// Backend whose every call fails, like a full or revoked storage quota.
struct BrokenStore;

impl KvStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("read refused".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("remove refused".to_string()))
    }
}

fn start() -> DayStateMachine<KvDayRepository<BrokenStore>, FixedClock> {
    DayStateMachine::start(
        KvDayRepository::new(BrokenStore),
        FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()),
        ItemStore::new(
            Box::new(SequentialIdGenerator::new()),
            Box::new(RandomLayout::seeded(9)),
        ),
    )
}

#[test]
fn unreadable_storage_starts_an_empty_dump() {
    let machine = start();
    assert_eq!(machine.stage(), Stage::Dump);
    let DayView::Dump(view) = machine.view() else {
        panic!("expected dump view");
    };
    assert!(view.recents.is_empty());
}

#[test]
fn failed_writes_keep_in_memory_flow_authoritative() {
    let mut machine = start();
    let id = machine.add_item("Call mom").unwrap();
    machine.finish_dump().unwrap();
    machine.toggle_type(&id);
    assert_eq!(machine.finish_selection().unwrap(), Stage::Explain);
    machine.dismiss_explanation().unwrap();
    machine.set_energy(Energy::Low);
    machine.set_action(&id, "Dial");

    assert_eq!(machine.lock().unwrap(), Stage::Locked);
    assert!(machine.toggle_handled(&id));
    assert!(machine.items()[0].handled);

    assert!(machine.reset(|| true).is_ok());
    assert_eq!(machine.stage(), Stage::Dump);
    assert!(machine.items().is_empty());
}
