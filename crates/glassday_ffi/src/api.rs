//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the day flow to Dart via FRB as flat, stage-tagged envelopes.
//! - Own the single process-wide session behind a mutex.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutating call returns the view rendered after the mutation.
//! - A poisoned session lock is recovered, never propagated.

use glassday_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_session,
    AppConfig, DayView, Energy, GlassEntry, GlassStatus, Item, ItemId, LogLevel, ResetOutcome,
    SqliteDaySession,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

type SessionSlot = Mutex<Option<SqliteDaySession>>;

static SESSION: OnceLock<SessionSlot> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match LogLevel::parse(&level) {
        Ok(level) => level,
        Err(err) => return err.to_string(),
    };
    if log_dir.trim().is_empty() {
        return "log_dir must not be empty".to_string();
    }
    match init_logging_inner(level, Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One item as the UI draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDto {
    pub id: String,
    pub text: String,
    /// `glass|rubber`.
    pub kind: String,
    pub action: Option<String>,
    pub handled: bool,
    /// Viewport percentage, present once the item was placed.
    pub top: Option<u8>,
    pub left: Option<u8>,
    pub rotation: Option<i8>,
    /// Zero-based glass priority, only in the balance stage.
    pub rank: Option<u32>,
    /// Beyond today's capacity; action editing is disabled.
    pub postponed: bool,
}

/// Flattened read model of the current stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayViewDto {
    /// `dump|select|explain|balance|locked`.
    pub stage: String,
    /// Dump/select: every item. Balance: glass items by rank. Locked: carried items.
    pub items: Vec<ItemDto>,
    /// Rubber container, balance stage only.
    pub rubber: Vec<ItemDto>,
    /// Quick-add suggestions, dump stage only.
    pub recents: Vec<String>,
    pub energy: Option<String>,
    /// Whether the forward trigger of this stage is offered.
    pub can_advance: bool,
    pub too_much_glass: bool,
}

/// Envelope returned by every session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayResponse {
    pub ok: bool,
    pub message: String,
    /// Current view; `None` only when no session is open.
    pub view: Option<DayViewDto>,
}

/// Opens (or reopens) today's session.
///
/// `db_path` empty means `GLASSDAY_DB` or `./glassday.sqlite3`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Replaces any previously open session.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn day_open(db_path: String) -> DayResponse {
    let mut slot = lock_slot(session_slot());

    let config = match resolve_config(db_path.trim(), |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => {
            warn!("event=config_resolve module=ffi status=error error={err}");
            return DayResponse {
                ok: false,
                message: format!("day_open failed: {err}"),
                view: current_view(&*slot),
            };
        }
    };

    match open_session(&config) {
        Ok(session) => {
            let view = to_view_dto(&session.view());
            *slot = Some(session);
            DayResponse {
                ok: true,
                message: "Session opened.".to_string(),
                view: Some(view),
            }
        }
        Err(err) => DayResponse {
            ok: false,
            message: format!("day_open failed: {err}"),
            view: current_view(&*slot),
        },
    }
}

/// Returns the current view without changing anything.
#[flutter_rust_bridge::frb(sync)]
pub fn day_view() -> DayResponse {
    with_session(session_slot(), |_| Ok(String::new()))
}

/// Captures one thought in the dump stage.
#[flutter_rust_bridge::frb(sync)]
pub fn day_add_item(text: String) -> DayResponse {
    with_session(session_slot(), |session| {
        session
            .add_item(&text)
            .map(|id| id.to_string())
            .ok_or_else(|| "Nothing was added.".to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn day_finish_dump() -> DayResponse {
    with_session(session_slot(), |session| {
        session.finish_dump().map(|_| String::new()).map_err(|err| err.to_string())
    })
}

/// Flips glass/rubber in the select stage.
#[flutter_rust_bridge::frb(sync)]
pub fn day_toggle_type(id: String) -> DayResponse {
    with_session(session_slot(), |session| {
        changed(session.toggle_type(&ItemId::new(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn day_finish_selection() -> DayResponse {
    with_session(session_slot(), |session| {
        session
            .finish_selection()
            .map(|_| String::new())
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn day_dismiss_explanation() -> DayResponse {
    with_session(session_slot(), |session| {
        session
            .dismiss_explanation()
            .map(|_| String::new())
            .map_err(|err| err.to_string())
    })
}

/// Picks `low|medium|high` in the balance stage.
#[flutter_rust_bridge::frb(sync)]
pub fn day_set_energy(level: String) -> DayResponse {
    with_session(session_slot(), |session| {
        let energy = Energy::parse(&level).ok_or_else(|| format!("unknown energy `{level}`"))?;
        changed(session.set_energy(energy))
    })
}

/// Commits a full glass ordering after a drag ends.
#[flutter_rust_bridge::frb(sync)]
pub fn day_reorder(ids: Vec<String>) -> DayResponse {
    with_session(session_slot(), |session| {
        let ids: Vec<ItemId> = ids.into_iter().map(ItemId::new).collect();
        changed(session.reorder(&ids))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn day_set_action(id: String, text: String) -> DayResponse {
    with_session(session_slot(), |session| {
        changed(session.set_action(&ItemId::new(id), &text))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn day_lock() -> DayResponse {
    with_session(session_slot(), |session| {
        session.lock().map(|_| String::new()).map_err(|err| err.to_string())
    })
}

/// Weak check on a carried item; persisted when the day is locked.
#[flutter_rust_bridge::frb(sync)]
pub fn day_toggle_handled(id: String) -> DayResponse {
    with_session(session_slot(), |session| {
        changed(session.toggle_handled(&ItemId::new(id)))
    })
}

/// Clears the locked day when `confirmed` is true.
///
/// The Dart side shows the confirmation dialog and passes its answer.
#[flutter_rust_bridge::frb(sync)]
pub fn day_reset(confirmed: bool) -> DayResponse {
    with_session(session_slot(), |session| {
        match session.reset(|| confirmed) {
            Ok(ResetOutcome::Cleared) => Ok("Day cleared.".to_string()),
            Ok(ResetOutcome::Declined) => Ok("Kept today's plan.".to_string()),
            Err(err) => Err(err.to_string()),
        }
    })
}

fn session_slot() -> &'static SessionSlot {
    SESSION.get_or_init(|| Mutex::new(None))
}

fn lock_slot(slot: &SessionSlot) -> MutexGuard<'_, Option<SqliteDaySession>> {
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("event=session_lock module=ffi status=recovered");
        poisoned.into_inner()
    })
}

fn with_session(
    slot: &SessionSlot,
    f: impl FnOnce(&mut SqliteDaySession) -> Result<String, String>,
) -> DayResponse {
    let mut guard = lock_slot(slot);
    let Some(session) = guard.as_mut() else {
        return DayResponse {
            ok: false,
            message: "No open day; call day_open first.".to_string(),
            view: None,
        };
    };

    let (ok, message) = match f(session) {
        Ok(message) => (true, message),
        Err(message) => (false, message),
    };
    DayResponse {
        ok,
        message,
        view: Some(to_view_dto(&session.view())),
    }
}

fn current_view(slot: &Option<SqliteDaySession>) -> Option<DayViewDto> {
    slot.as_ref().map(|session| to_view_dto(&session.view()))
}

fn changed(applied: bool) -> Result<String, String> {
    if applied {
        Ok(String::new())
    } else {
        Err("Not available right now.".to_string())
    }
}

/// Env config with an optional explicit database path on top.
///
/// An invalid override is reported rather than replaced by defaults, so a
/// session never silently moves to another database file.
fn resolve_config(
    db_path: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, String> {
    let cwd = std::env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))?;
    let mut config = AppConfig::defaults_in(&cwd)
        .with_overrides(lookup)
        .map_err(|err| err.to_string())?;
    if !db_path.is_empty() {
        config.db_path = PathBuf::from(db_path);
    }
    Ok(config)
}

fn to_view_dto(view: &DayView) -> DayViewDto {
    match view {
        DayView::Dump(dump) => DayViewDto {
            stage: "dump".to_string(),
            items: dump.items.iter().map(to_item_dto).collect(),
            recents: dump.recents.clone(),
            can_advance: dump.can_finish,
            ..DayViewDto::default()
        },
        DayView::Select(select) => DayViewDto {
            stage: "select".to_string(),
            items: select.items.iter().map(to_item_dto).collect(),
            can_advance: true,
            too_much_glass: select.too_much_glass,
            ..DayViewDto::default()
        },
        DayView::Explain => DayViewDto {
            stage: "explain".to_string(),
            can_advance: true,
            ..DayViewDto::default()
        },
        DayView::Balance(balance) => DayViewDto {
            stage: "balance".to_string(),
            items: balance.glass.iter().map(to_glass_dto).collect(),
            rubber: balance.rubber.iter().map(to_item_dto).collect(),
            energy: balance.energy.map(|energy| energy.as_str().to_string()),
            can_advance: balance.can_lock,
            ..DayViewDto::default()
        },
        DayView::Locked(locked) => DayViewDto {
            stage: "locked".to_string(),
            items: locked.carried.iter().map(to_item_dto).collect(),
            ..DayViewDto::default()
        },
    }
}

fn to_item_dto(item: &Item) -> ItemDto {
    ItemDto {
        id: item.id.to_string(),
        text: item.text.clone(),
        kind: item.kind.as_str().to_string(),
        action: item.action.clone(),
        handled: item.handled,
        top: item.pos.map(|pos| pos.top),
        left: item.pos.map(|pos| pos.left),
        rotation: item.pos.map(|pos| pos.rotation),
        rank: None,
        postponed: false,
    }
}

fn to_glass_dto(entry: &GlassEntry) -> ItemDto {
    ItemDto {
        rank: u32::try_from(entry.rank).ok(),
        postponed: entry.status == GlassStatus::Postponed,
        ..to_item_dto(&entry.item)
    }
}
