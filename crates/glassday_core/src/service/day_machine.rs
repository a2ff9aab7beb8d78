//! Five-stage day flow orchestration.
//!
//! # Responsibility
//! - Resolve the initial stage from the persisted day record.
//! - Gate stage transitions on their triggers and preconditions.
//! - Scope per-item controls to the stage that exposes them.
//! - Persist the locked day, recents and intro flag through `DayRepository`.
//!
//! # Invariants
//! - `Locked → Dump` (reset) is the only backward transition and requires
//!   confirmation.
//! - Every handled toggle while locked re-persists the full record.
//! - Derived flags (postponed, too much glass) are computed on read.
//! - Item text is never written to logs.

use crate::model::day::{day_key, Clock, DayRecord, Energy, Stage};
use crate::model::item::{Item, ItemId, ItemType};
use crate::repo::day_repo::DayRepository;
use crate::service::capacity::{
    status_at, too_much_glass, GlassStatus, DEFAULT_GLASS_WARNING_THRESHOLD,
};
use crate::service::item_store::ItemStore;
use crate::service::recency::{merge_recents, visible_recents};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// User signals that move the flow between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FinishDump,
    FinishSelection,
    DismissExplanation,
    Lock,
    Reset,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FinishDump => "finish_dump",
            Self::FinishSelection => "finish_selection",
            Self::DismissExplanation => "dismiss_explanation",
            Self::Lock => "lock",
            Self::Reset => "reset",
        }
    }

    fn source_stage(self) -> Stage {
        match self {
            Self::FinishDump => Stage::Dump,
            Self::FinishSelection => Stage::Select,
            Self::DismissExplanation => Stage::Explain,
            Self::Lock => Stage::Balance,
            Self::Reset => Stage::Locked,
        }
    }
}

/// Rejected stage transition. State is unchanged when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The current stage does not expose this trigger.
    NotAvailable { stage: Stage, trigger: Trigger },
    /// Locking requires an energy level.
    EnergyNotSelected,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAvailable { stage, trigger } => {
                write!(f, "`{}` is not available in stage `{stage}`", trigger.as_str())
            }
            Self::EnergyNotSelected => write!(f, "select an energy level before locking"),
        }
    }
}

impl Error for TransitionError {}

/// Outcome of a reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Cleared,
    Declined,
}

/// Tunables of the day flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub glass_warning_threshold: usize,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            glass_warning_threshold: DEFAULT_GLASS_WARNING_THRESHOLD,
        }
    }
}

/// Glass item as shown in the balance stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlassEntry {
    pub item: Item,
    /// Zero-based priority rank among glass items.
    pub rank: usize,
    pub status: GlassStatus,
}

impl GlassEntry {
    /// Postponed items keep their action but cannot edit it.
    pub fn action_editable(&self) -> bool {
        self.status == GlassStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpView {
    pub items: Arc<[Item]>,
    /// Stored recents not yet captured today.
    pub recents: Vec<String>,
    /// The "done" trigger is offered once something was captured.
    pub can_finish: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectView {
    pub items: Arc<[Item]>,
    pub glass_count: usize,
    pub too_much_glass: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceView {
    pub energy: Option<Energy>,
    /// Glass items are shown only once an energy level is picked.
    pub glass: Vec<GlassEntry>,
    pub rubber: Vec<Item>,
    pub can_lock: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedView {
    /// Glass items carrying a non-empty action, in priority order.
    pub carried: Vec<Item>,
}

/// Read model of the current stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayView {
    Dump(DumpView),
    Select(SelectView),
    Explain,
    Balance(BalanceView),
    Locked(LockedView),
}

/// Orchestrates one planning session.
pub struct DayStateMachine<R: DayRepository, C: Clock> {
    stage: Stage,
    store: ItemStore,
    energy: Option<Energy>,
    repo: R,
    clock: C,
    settings: FlowSettings,
}

impl<R: DayRepository, C: Clock> DayStateMachine<R, C> {
    /// Starts a session, resuming today's locked day when one is stored.
    ///
    /// A record for another day is ignored but left in storage.
    pub fn start(repo: R, clock: C, store: ItemStore) -> Self {
        Self::with_settings(repo, clock, store, FlowSettings::default())
    }

    pub fn with_settings(repo: R, clock: C, mut store: ItemStore, settings: FlowSettings) -> Self {
        let today = day_key(clock.today());
        store.clear();

        let stage = match repo.load() {
            Some(record) if record.is_resumable_on(&today) => {
                info!(
                    "event=day_resume module=flow status=ok items={}",
                    record.items.len()
                );
                store.restore(record.items);
                Stage::Locked
            }
            Some(_) => {
                info!("event=day_resume module=flow status=stale");
                Stage::Dump
            }
            None => Stage::Dump,
        };

        Self {
            stage,
            store,
            energy: None,
            repo,
            clock,
            settings,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn energy(&self) -> Option<Energy> {
        self.energy
    }

    pub fn items(&self) -> Arc<[Item]> {
        self.store.snapshot()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Read model for the current stage.
    pub fn view(&self) -> DayView {
        match self.stage {
            Stage::Dump => DayView::Dump(self.dump_view()),
            Stage::Select => DayView::Select(self.select_view()),
            Stage::Explain => DayView::Explain,
            Stage::Balance => DayView::Balance(self.balance_view()),
            Stage::Locked => DayView::Locked(self.locked_view()),
        }
    }

    pub fn dump_view(&self) -> DumpView {
        let items = self.store.snapshot();
        DumpView {
            recents: visible_recents(&self.repo.load_recents(), &items),
            can_finish: !items.is_empty(),
            items,
        }
    }

    pub fn select_view(&self) -> SelectView {
        let glass_count = self.store.glass_count();
        SelectView {
            items: self.store.snapshot(),
            glass_count,
            too_much_glass: too_much_glass(glass_count, self.settings.glass_warning_threshold),
        }
    }

    pub fn balance_view(&self) -> BalanceView {
        let glass = if self.energy.is_some() {
            self.glass_entries()
        } else {
            Vec::new()
        };
        BalanceView {
            energy: self.energy,
            glass,
            rubber: self.store.rubber().cloned().collect(),
            can_lock: self.energy.is_some(),
        }
    }

    pub fn locked_view(&self) -> LockedView {
        LockedView {
            carried: self
                .store
                .glass()
                .filter(|item| item.has_action())
                .cloned()
                .collect(),
        }
    }

    /// Glass items with rank and capacity status under the current energy.
    pub fn glass_entries(&self) -> Vec<GlassEntry> {
        self.store
            .glass()
            .enumerate()
            .map(|(rank, item)| GlassEntry {
                item: item.clone(),
                rank,
                status: status_at(rank, self.energy),
            })
            .collect()
    }

    // --- Dump ---

    /// Captures a thought. Blank text and non-dump stages are no-ops.
    pub fn add_item(&mut self, text: &str) -> Option<ItemId> {
        if !self.control_available(Stage::Dump, "add_item") {
            return None;
        }
        let id = self.store.add_item(text)?;
        debug!(
            "event=item_add module=flow status=ok id={id} items={}",
            self.store.len()
        );
        Some(id)
    }

    /// Dump → Select.
    pub fn finish_dump(&mut self) -> Result<Stage, TransitionError> {
        self.expect_stage(Trigger::FinishDump)?;
        Ok(self.enter(Stage::Select, Trigger::FinishDump))
    }

    // --- Select ---

    pub fn set_type(&mut self, id: &ItemId, kind: ItemType) -> bool {
        self.control_available(Stage::Select, "set_type") && self.store.set_type(id, kind)
    }

    pub fn toggle_type(&mut self, id: &ItemId) -> bool {
        self.control_available(Stage::Select, "toggle_type") && self.store.toggle_type(id)
    }

    /// Select → Explain on first use, Select → Balance afterwards.
    pub fn finish_selection(&mut self) -> Result<Stage, TransitionError> {
        self.expect_stage(Trigger::FinishSelection)?;
        let next = if self.repo.intro_seen() {
            Stage::Balance
        } else {
            Stage::Explain
        };
        Ok(self.enter(next, Trigger::FinishSelection))
    }

    // --- Explain ---

    /// Explain → Balance; the explanation is never shown again.
    pub fn dismiss_explanation(&mut self) -> Result<Stage, TransitionError> {
        self.expect_stage(Trigger::DismissExplanation)?;
        self.repo.mark_intro_seen();
        Ok(self.enter(Stage::Balance, Trigger::DismissExplanation))
    }

    // --- Balance ---

    pub fn set_energy(&mut self, energy: Energy) -> bool {
        if !self.control_available(Stage::Balance, "set_energy") {
            return false;
        }
        self.energy = Some(energy);
        debug!(
            "event=energy_set module=flow status=ok energy={}",
            energy.as_str()
        );
        true
    }

    /// Commits a new glass priority order.
    pub fn reorder(&mut self, new_glass_order: &[ItemId]) -> bool {
        if !self.control_available(Stage::Balance, "reorder") {
            return false;
        }
        let changed = self.store.reorder(new_glass_order);
        if !changed {
            debug!("event=glass_reorder module=flow status=ignored");
        }
        changed
    }

    /// Sets the action of an active glass item.
    ///
    /// Postponed and rubber items keep whatever action they already hold.
    pub fn set_action(&mut self, id: &ItemId, text: &str) -> bool {
        if !self.control_available(Stage::Balance, "set_action") {
            return false;
        }
        let editable = self
            .glass_entries()
            .iter()
            .any(|entry| &entry.item.id == id && entry.action_editable());
        editable && self.store.set_action(id, text)
    }

    /// Balance → Locked. Persists the day and folds glass texts into recents.
    pub fn lock(&mut self) -> Result<Stage, TransitionError> {
        self.expect_stage(Trigger::Lock)?;
        if self.energy.is_none() {
            return Err(TransitionError::EnergyNotSelected);
        }

        let previous = self.repo.load_recents();
        let recents = merge_recents(self.store.glass().map(|item| item.text.as_str()), &previous);
        self.repo.save_recents(&recents);
        self.persist_day();

        info!(
            "event=day_lock module=flow status=ok items={} glass={} carried={}",
            self.store.len(),
            self.store.glass_count(),
            self.locked_view().carried.len()
        );
        Ok(self.enter(Stage::Locked, Trigger::Lock))
    }

    // --- Locked ---

    /// Flips the weak check of one item; persists immediately when locked.
    pub fn toggle_handled(&mut self, id: &ItemId) -> bool {
        let changed = self.store.toggle_handled(id);
        if changed && self.stage == Stage::Locked {
            self.persist_day();
        }
        changed
    }

    /// Locked → Dump after `confirm` approves. Deletes the stored day.
    pub fn reset(&mut self, confirm: impl FnOnce() -> bool) -> Result<ResetOutcome, TransitionError> {
        self.expect_stage(Trigger::Reset)?;
        if !confirm() {
            info!("event=day_reset module=flow status=declined");
            return Ok(ResetOutcome::Declined);
        }

        self.repo.clear();
        self.store.clear();
        self.energy = None;
        self.enter(Stage::Dump, Trigger::Reset);
        Ok(ResetOutcome::Cleared)
    }

    fn persist_day(&mut self) {
        let record = DayRecord::locked(day_key(self.clock.today()), self.store.items().to_vec());
        self.repo.save(&record);
    }

    fn expect_stage(&self, trigger: Trigger) -> Result<(), TransitionError> {
        if self.stage == trigger.source_stage() {
            return Ok(());
        }
        warn!(
            "event=transition module=flow status=rejected stage={} trigger={}",
            self.stage,
            trigger.as_str()
        );
        Err(TransitionError::NotAvailable {
            stage: self.stage,
            trigger,
        })
    }

    fn control_available(&self, stage: Stage, control: &str) -> bool {
        if self.stage == stage {
            return true;
        }
        debug!(
            "event=item_control module=flow status=ignored stage={} control={control}",
            self.stage
        );
        false
    }

    fn enter(&mut self, next: Stage, trigger: Trigger) -> Stage {
        info!(
            "event=transition module=flow status=ok from={} to={} trigger={}",
            self.stage,
            next,
            trigger.as_str()
        );
        self.stage = next;
        next
    }
}
