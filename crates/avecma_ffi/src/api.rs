//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Resolve configuration once and open the store per call.
//! - Keep one planner session alive so undo/redo spans calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through envelopes, never by unwinding.
//! - Structured payloads cross the boundary as JSON strings.

use avecma_core::model::tracker::MonthKey;
use avecma_core::stats::cycle::period_history;
use avecma_core::stats::ledger::recent_expenses;
use avecma_core::{
    core_version as core_version_inner, dashboard_stats, handle_analyze_json, handle_chat_json,
    init_logging as init_logging_inner, ping as ping_inner, AppConfig, CalendarService,
    CapacityLevel, CapacityMode, FinanceService, GeminiClient, LoadLevel, Month, NewTask,
    ProfileService, RelayResponse, SqliteStore, TrackerService, TransactionDraft,
    TransactionKind, UserScope,
};
use chrono::{Datelike, NaiveDate, Utc};
use log::{error, warn};
use once_cell::sync::Lazy;
use serde_json::json;
use std::sync::{Mutex, OnceLock};

const RECENT_EXPENSES_LIMIT: usize = 7;
const TOP_PRIORITIES_LIMIT: usize = 3;

static APP_CONFIG: OnceLock<Result<AppConfig, String>> = OnceLock::new();
static CALENDAR_SESSION: Lazy<Mutex<Option<CalendarService<SqliteStore>>>> =
    Lazy::new(|| Mutex::new(None));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
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
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result of one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created or touched record, when there is one.
    pub id: Option<i64>,
    /// Operation-specific flag (completed, paid, marked), when there is one.
    pub flag: Option<bool>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: None,
            flag: None,
            message: message.into(),
        }
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn with_flag(mut self, flag: bool) -> Self {
        self.flag = Some(flag);
        self
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            flag: None,
            message: message.into(),
        }
    }
}

/// Result of one query; `json` is empty on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub ok: bool,
    pub json: String,
    pub message: String,
}

impl JsonResponse {
    fn from_value(value: serde_json::Value) -> Self {
        Self {
            ok: true,
            json: value.to_string(),
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            json: String::new(),
            message: message.into(),
        }
    }
}

/// Capacity of one planner view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityResponse {
    pub ok: bool,
    /// 0..=100.
    pub capacity: u32,
    /// `LOW|MEDIUM|HIGH`.
    pub level: String,
    pub message: String,
}

/// Relay status plus JSON body, mirroring an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEnvelope {
    pub status: u16,
    pub body_json: String,
}

impl From<RelayResponse> for RelayEnvelope {
    fn from(value: RelayResponse) -> Self {
        Self {
            status: value.status,
            body_json: value.body.to_string(),
        }
    }
}

/// Adds a calendar task for `user` (`None` = guest).
///
/// Input semantics:
/// - `date`: `YYYY-MM-DD`.
/// - `time`: `HH:MM`, ignored when `is_all_day`.
/// - `load`: `light|medium|heavy`; unknown or missing means medium.
///
/// # FFI contract
/// - Sync call, DB-backed execution. Records one undo step on success.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_add_task(
    user: Option<String>,
    title: String,
    description: String,
    date: String,
    time: Option<String>,
    load: Option<String>,
    is_all_day: bool,
) -> ActionResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(err) => return ActionResponse::failure(format!("calendar_add_task failed: {err}")),
    };
    let input = NewTask {
        title,
        description,
        date,
        time,
        load: load.as_deref().and_then(LoadLevel::parse),
        is_all_day,
    };
    match with_calendar(user, |calendar| {
        calendar.add_task(input).map_err(|err| err.to_string())
    }) {
        Ok(id) => ActionResponse::success("Task added.").with_id(id),
        Err(err) => ActionResponse::failure(format!("calendar_add_task failed: {err}")),
    }
}

/// Flips completion of one task; `flag` carries the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_toggle_task(user: Option<String>, id: i64) -> ActionResponse {
    match with_calendar(user, |calendar| {
        calendar.toggle_complete(id).map_err(|err| err.to_string())
    }) {
        Ok(completed) => ActionResponse::success("Task updated.")
            .with_id(id)
            .with_flag(completed),
        Err(err) => ActionResponse::failure(format!("calendar_toggle_task failed: {err}")),
    }
}

/// Undoes the last calendar mutation; `flag` is `false` when nothing changed.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_undo(user: Option<String>) -> ActionResponse {
    match with_calendar(user, |calendar| calendar.undo().map_err(|err| err.to_string())) {
        Ok(changed) => ActionResponse::success(if changed {
            "Undone."
        } else {
            "Nothing to undo."
        })
        .with_flag(changed),
        Err(err) => ActionResponse::failure(format!("calendar_undo failed: {err}")),
    }
}

/// Redoes the last undone calendar mutation.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_redo(user: Option<String>) -> ActionResponse {
    match with_calendar(user, |calendar| calendar.redo().map_err(|err| err.to_string())) {
        Ok(changed) => ActionResponse::success(if changed {
            "Redone."
        } else {
            "Nothing to redo."
        })
        .with_flag(changed),
        Err(err) => ActionResponse::failure(format!("calendar_redo failed: {err}")),
    }
}

/// Tasks plus undo/redo availability as JSON
/// `{tasks, canUndo, canRedo}`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_snapshot(user: Option<String>) -> JsonResponse {
    match with_calendar(user, |calendar| {
        Ok(json!({
            "tasks": calendar.tasks(),
            "canUndo": calendar.planner().can_undo(),
            "canRedo": calendar.planner().can_redo(),
        }))
    }) {
        Ok(value) => JsonResponse::from_value(value),
        Err(err) => JsonResponse::failure(format!("calendar_snapshot failed: {err}")),
    }
}

/// Capacity for `mode` (`today|month|year`) relative to `today` and the
/// viewed month (`year`, zero-based `month0`).
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_capacity(
    user: Option<String>,
    mode: String,
    today: String,
    year: i32,
    month0: u32,
) -> CapacityResponse {
    let failure = |message: String| CapacityResponse {
        ok: false,
        capacity: 0,
        level: CapacityLevel::Low.as_str().to_string(),
        message,
    };
    let Some(mode) = CapacityMode::parse(&mode) else {
        return failure(format!("calendar_capacity failed: unknown mode `{mode}`"));
    };
    let today = match parse_date(&today) {
        Ok(date) => date,
        Err(err) => return failure(format!("calendar_capacity failed: {err}")),
    };
    let viewed = match MonthKey::new(year, month0) {
        Ok(key) => key,
        Err(err) => return failure(format!("calendar_capacity failed: {err}")),
    };
    match with_calendar(user, |calendar| Ok(calendar.capacity(mode, today, viewed))) {
        Ok(capacity) => CapacityResponse {
            ok: true,
            capacity,
            level: CapacityLevel::of(capacity).as_str().to_string(),
            message: String::new(),
        },
        Err(err) => failure(format!("calendar_capacity failed: {err}")),
    }
}

/// Home dashboard as JSON: statistics, top priorities and recent expenses.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_snapshot(user: Option<String>, today: String) -> JsonResponse {
    let today = match parse_date(&today) {
        Ok(date) => date,
        Err(err) => return JsonResponse::failure(format!("dashboard_snapshot failed: {err}")),
    };
    let Some(month) = Month::from_index0(today.month0()) else {
        return JsonResponse::failure("dashboard_snapshot failed: invalid month");
    };
    let scope = UserScope::new(user.as_deref());
    let transactions = match open_store().and_then(|store| {
        FinanceService::new(store, scope)
            .list()
            .map_err(|err| err.to_string())
    }) {
        Ok(entries) => entries,
        Err(err) => return JsonResponse::failure(format!("dashboard_snapshot failed: {err}")),
    };

    match with_calendar(user, |calendar| {
        let stats = dashboard_stats(calendar.tasks(), &transactions, today, month);
        Ok(json!({
            "stats": stats,
            "topPriorities": calendar.planner().top_priorities(TOP_PRIORITIES_LIMIT),
            "recentExpenses": recent_expenses(&transactions, RECENT_EXPENSES_LIMIT),
        }))
    }) {
        Ok(value) => JsonResponse::from_value(value),
        Err(err) => JsonResponse::failure(format!("dashboard_snapshot failed: {err}")),
    }
}

/// Adds an unpaid ledger entry.
///
/// Input semantics:
/// - `kind`: `income|expense|bill`.
/// - `month`: English month name, case-insensitive.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_add(
    user: Option<String>,
    label: String,
    amount: f64,
    kind: String,
    month: String,
) -> ActionResponse {
    let parsed = parse_kind(&kind).and_then(|kind| {
        month
            .parse::<Month>()
            .map(|month| (kind, month))
            .map_err(|err| err.to_string())
    });
    let (kind, month) = match parsed {
        Ok(pair) => pair,
        Err(err) => return ActionResponse::failure(format!("finance_add failed: {err}")),
    };
    let draft = TransactionDraft {
        label,
        amount,
        kind,
    };
    match with_finance(user, |finance| finance.add(draft, month)) {
        Ok(entry) => ActionResponse::success("Transaction added.").with_id(entry.id),
        Err(err) => ActionResponse::failure(format!("finance_add failed: {err}")),
    }
}

/// Replaces label, amount and kind of one entry.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_edit(
    user: Option<String>,
    id: i64,
    label: String,
    amount: f64,
    kind: String,
) -> ActionResponse {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(err) => return ActionResponse::failure(format!("finance_edit failed: {err}")),
    };
    let draft = TransactionDraft {
        label,
        amount,
        kind,
    };
    match with_finance(user, |finance| finance.edit(id, draft)) {
        Ok(entry) => ActionResponse::success("Transaction updated.").with_id(entry.id),
        Err(err) => ActionResponse::failure(format!("finance_edit failed: {err}")),
    }
}

/// Deletes one entry; `flag` tells whether it existed.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_delete(user: Option<String>, id: i64) -> ActionResponse {
    match with_finance(user, |finance| finance.delete(id)) {
        Ok(existed) => ActionResponse::success("Transaction deleted.")
            .with_id(id)
            .with_flag(existed),
        Err(err) => ActionResponse::failure(format!("finance_delete failed: {err}")),
    }
}

/// Flips the paid flag of one bill; `flag` carries the new state.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_toggle_paid(user: Option<String>, id: i64) -> ActionResponse {
    match with_finance(user, |finance| finance.toggle_paid(id)) {
        Ok(paid) => ActionResponse::success("Transaction updated.")
            .with_id(id)
            .with_flag(paid),
        Err(err) => ActionResponse::failure(format!("finance_toggle_paid failed: {err}")),
    }
}

/// Removes every entry of one month.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_clear_month(user: Option<String>, month: String) -> ActionResponse {
    let month = match month.parse::<Month>() {
        Ok(month) => month,
        Err(err) => {
            return ActionResponse::failure(format!("finance_clear_month failed: {err}"))
        }
    };
    match with_finance(user, |finance| finance.clear_month(month)) {
        Ok(removed) => ActionResponse::success(format!("Removed {removed} transaction(s).")),
        Err(err) => ActionResponse::failure(format!("finance_clear_month failed: {err}")),
    }
}

/// Ledger view for one month as JSON.
///
/// Shape: `{transactions, summary, trend, recentExpenses}`.
#[flutter_rust_bridge::frb(sync)]
pub fn finance_snapshot(user: Option<String>, month: String) -> JsonResponse {
    let month = match month.parse::<Month>() {
        Ok(month) => month,
        Err(err) => return JsonResponse::failure(format!("finance_snapshot failed: {err}")),
    };
    match with_finance(user, |finance| {
        let transactions = finance.list()?;
        Ok(json!({
            "summary": finance.summary(month)?,
            "trend": finance.trend()?,
            "recentExpenses": finance.recent_expenses(RECENT_EXPENSES_LIMIT)?,
            "transactions": transactions,
        }))
    }) {
        Ok(value) => JsonResponse::from_value(value),
        Err(err) => JsonResponse::failure(format!("finance_snapshot failed: {err}")),
    }
}

/// Marks or unmarks one period day; `flag` is `true` when now marked.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_toggle_period(
    user: Option<String>,
    year: i32,
    month0: u32,
    day: u32,
) -> ActionResponse {
    let result = MonthKey::new(year, month0)
        .map_err(|err| err.to_string())
        .and_then(|key| with_tracker(user, |tracker| tracker.toggle_period(key, day)));
    match result {
        Ok(marked) => ActionResponse::success("Period updated.").with_flag(marked),
        Err(err) => ActionResponse::failure(format!("tracker_toggle_period failed: {err}")),
    }
}

/// Sets one day's mood color; picking the same color again clears it.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_toggle_mood(
    user: Option<String>,
    year: i32,
    month0: u32,
    day: u32,
    color: String,
) -> ActionResponse {
    let result = MonthKey::new(year, month0)
        .map_err(|err| err.to_string())
        .and_then(|key| with_tracker(user, |tracker| tracker.toggle_mood(key, day, &color)));
    match result {
        Ok(recorded) => ActionResponse::success("Mood updated.").with_flag(recorded.is_some()),
        Err(err) => ActionResponse::failure(format!("tracker_toggle_mood failed: {err}")),
    }
}

/// Recolors one palette slot (`#RGB` or `#RRGGBB`).
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_set_palette_color(
    user: Option<String>,
    index: u32,
    color: String,
) -> ActionResponse {
    match with_tracker(user, |tracker| {
        tracker.set_palette_color(index as usize, &color)
    }) {
        Ok(_) => ActionResponse::success("Palette updated."),
        Err(err) => ActionResponse::failure(format!("tracker_set_palette_color failed: {err}")),
    }
}

/// Renames one palette slot.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_set_palette_label(
    user: Option<String>,
    index: u32,
    label: String,
) -> ActionResponse {
    match with_tracker(user, |tracker| {
        tracker.set_palette_label(index as usize, &label)
    }) {
        Ok(_) => ActionResponse::success("Palette updated."),
        Err(err) => ActionResponse::failure(format!("tracker_set_palette_label failed: {err}")),
    }
}

/// Tracker view as JSON
/// `{periods, moods, palette, history, averageCycle, nextPeriodStart}`.
#[flutter_rust_bridge::frb(sync)]
pub fn tracker_snapshot(user: Option<String>) -> JsonResponse {
    match with_tracker(user, |tracker| {
        let periods = tracker.periods()?;
        Ok(json!({
            "history": period_history(&periods),
            "averageCycle": tracker.average_cycle()?,
            "nextPeriodStart": tracker.next_period_start()?,
            "periods": periods,
            "moods": tracker.moods()?,
            "palette": tracker.palette()?,
        }))
    }) {
        Ok(value) => JsonResponse::from_value(value),
        Err(err) => JsonResponse::failure(format!("tracker_snapshot failed: {err}")),
    }
}

/// Stores the profile image data URL; blank removes it.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_set_image(user: Option<String>, data_url: String) -> ActionResponse {
    match with_profile(user, |profile| profile.set_profile_image(&data_url)) {
        Ok(()) => ActionResponse::success("Profile image saved."),
        Err(err) => ActionResponse::failure(format!("profile_set_image failed: {err}")),
    }
}

/// Profile image and archived chats as JSON `{profileImage, pastChats}`.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_snapshot(user: Option<String>) -> JsonResponse {
    match with_profile(user, |profile| {
        Ok(json!({
            "profileImage": profile.profile_image()?,
            "pastChats": profile.past_chats()?,
        }))
    }) {
        Ok(value) => JsonResponse::from_value(value),
        Err(err) => JsonResponse::failure(format!("profile_snapshot failed: {err}")),
    }
}

/// Archives one finished conversation summary.
#[flutter_rust_bridge::frb(sync)]
pub fn chats_archive(user: Option<String>, title: String, summary: String) -> JsonResponse {
    match with_profile(user, |profile| profile.archive_chat(&title, &summary)) {
        Ok(chat) => JsonResponse::from_value(json!(chat)),
        Err(err) => JsonResponse::failure(format!("chats_archive failed: {err}")),
    }
}

/// Drops per-user profile, chat and calendar documents and the live
/// planner session.
#[flutter_rust_bridge::frb(sync)]
pub fn sign_out(user: Option<String>) -> ActionResponse {
    let scope = UserScope::new(user.as_deref());
    if let Ok(mut session) = CALENDAR_SESSION.lock() {
        if session
            .as_ref()
            .is_some_and(|calendar| calendar.scope() == &scope)
        {
            *session = None;
        }
    }
    match with_profile(user, |profile| profile.sign_out_reset()) {
        Ok(removed) => {
            ActionResponse::success(format!("Signed out; removed {removed} document(s)."))
        }
        Err(err) => ActionResponse::failure(format!("sign_out failed: {err}")),
    }
}

/// Chat relay: `{message, history, therapist?}` in, status + JSON body out.
///
/// # FFI contract
/// - Async call; FRB runs it on its worker pool.
/// - Bounded by the configured request timeout.
pub fn assistant_chat(request_json: String) -> RelayEnvelope {
    match gemini_client() {
        Ok(client) => handle_chat_json(&client, &request_json).into(),
        Err(message) => internal_error(message),
    }
}

/// Analysis relay: `{events, transactions, currentMonth}` in.
///
/// "Today" is the current UTC date. Async like `assistant_chat`.
pub fn assistant_analyze(request_json: String) -> RelayEnvelope {
    match gemini_client() {
        Ok(client) => {
            handle_analyze_json(&client, &request_json, Utc::now().date_naive()).into()
        }
        Err(message) => internal_error(message),
    }
}

fn app_config() -> Result<&'static AppConfig, String> {
    APP_CONFIG
        .get_or_init(|| {
            AppConfig::from_env().map_err(|err| {
                error!("event=config_load module=ffi status=error error={err}");
                err.to_string()
            })
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn open_store() -> Result<SqliteStore, String> {
    let config = app_config()?;
    SqliteStore::open(&config.db_path).map_err(|err| format!("store open failed: {err}"))
}

fn with_calendar<T>(
    user: Option<String>,
    f: impl FnOnce(&mut CalendarService<SqliteStore>) -> Result<T, String>,
) -> Result<T, String> {
    let scope = UserScope::new(user.as_deref());
    let mut session = CALENDAR_SESSION
        .lock()
        .map_err(|_| "calendar session lock poisoned".to_string())?;

    let stale = session
        .as_ref()
        .map_or(true, |calendar| calendar.scope() != &scope);
    if stale {
        let history_limit = app_config()?.history_limit;
        let calendar = CalendarService::load(open_store()?, scope, history_limit)
            .map_err(|err| err.to_string())?;
        *session = Some(calendar);
    }

    match session.as_mut() {
        Some(calendar) => f(calendar),
        None => Err("calendar session unavailable".to_string()),
    }
}

fn with_finance<T>(
    user: Option<String>,
    f: impl FnOnce(&FinanceService<SqliteStore>) -> avecma_core::ServiceResult<T>,
) -> Result<T, String> {
    let service = FinanceService::new(open_store()?, UserScope::new(user.as_deref()));
    f(&service).map_err(|err| err.to_string())
}

fn with_tracker<T>(
    user: Option<String>,
    f: impl FnOnce(&TrackerService<SqliteStore>) -> avecma_core::ServiceResult<T>,
) -> Result<T, String> {
    let service = TrackerService::new(open_store()?, UserScope::new(user.as_deref()));
    f(&service).map_err(|err| err.to_string())
}

fn with_profile<T>(
    user: Option<String>,
    f: impl FnOnce(&ProfileService<SqliteStore>) -> avecma_core::ServiceResult<T>,
) -> Result<T, String> {
    let service = ProfileService::new(open_store()?, UserScope::new(user.as_deref()));
    f(&service).map_err(|err| err.to_string())
}

fn gemini_client() -> Result<GeminiClient, String> {
    let config = app_config()?;
    GeminiClient::new(&config.assistant).map_err(|err| {
        warn!(
            "event=assistant_client module=ffi status=error kind={}",
            err.kind.as_str()
        );
        err.to_string()
    })
}

fn internal_error(message: String) -> RelayEnvelope {
    RelayEnvelope {
        status: 500,
        body_json: json!({ "error": message }).to_string(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("date `{}` must use YYYY-MM-DD", raw.trim()))
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        "bill" => Ok(TransactionKind::Bill),
        other => Err(format!(
            "unknown transaction type `{other}`; expected income|expense|bill"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        assistant_chat, calendar_add_task, calendar_capacity, calendar_redo, calendar_snapshot,
        calendar_toggle_task, calendar_undo, core_version, finance_add, finance_snapshot,
        finance_toggle_paid, init_logging, ping, profile_snapshot, sign_out, tracker_snapshot,
        tracker_toggle_period,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn calendar_undo_and_redo_span_calls() {
        let user = Some(unique_user("calendar"));
        let added = calendar_add_task(
            user.clone(),
            "Bath time".to_string(),
            String::new(),
            "2026-04-01".to_string(),
            None,
            Some("heavy".to_string()),
            true,
        );
        assert!(added.ok, "{}", added.message);
        let id = added.id.expect("add should return id");

        let toggled = calendar_toggle_task(user.clone(), id);
        assert_eq!(toggled.flag, Some(true));

        let capacity = calendar_capacity(
            user.clone(),
            "today".to_string(),
            "2026-04-01".to_string(),
            2026,
            3,
        );
        assert!(capacity.ok, "{}", capacity.message);
        assert_eq!(capacity.capacity, 0);

        assert_eq!(calendar_undo(user.clone()).flag, Some(true));
        let snapshot = calendar_snapshot(user.clone());
        let value: serde_json::Value = serde_json::from_str(&snapshot.json).unwrap();
        assert_eq!(value["tasks"][0]["completed"], false);
        assert_eq!(value["canRedo"], true);

        assert_eq!(calendar_redo(user.clone()).flag, Some(true));
        assert_eq!(calendar_redo(user).flag, Some(false));
    }

    #[test]
    fn calendar_rejects_bad_dates_without_panicking() {
        let response = calendar_add_task(
            Some(unique_user("bad-date")),
            "x".to_string(),
            String::new(),
            "04/01/2026".to_string(),
            None,
            None,
            true,
        );
        assert!(!response.ok);
        assert!(response.message.contains("YYYY-MM-DD"));
    }

    #[test]
    fn finance_round_trip_reports_remaining() {
        let user = Some(unique_user("finance"));
        let income = finance_add(
            user.clone(),
            "Pay".to_string(),
            1000.0,
            "income".to_string(),
            "may".to_string(),
        );
        assert!(income.ok, "{}", income.message);
        let bill = finance_add(
            user.clone(),
            "Rent".to_string(),
            400.0,
            "bill".to_string(),
            "May".to_string(),
        );
        let bill_id = bill.id.expect("bill id");
        assert_eq!(finance_toggle_paid(user.clone(), bill_id).flag, Some(true));

        let snapshot = finance_snapshot(user.clone(), "May".to_string());
        assert!(snapshot.ok, "{}", snapshot.message);
        let value: serde_json::Value = serde_json::from_str(&snapshot.json).unwrap();
        assert_eq!(value["summary"]["remaining"], 600.0);
        assert_eq!(value["recentExpenses"], serde_json::json!([]));

        let bad = finance_add(
            user,
            "  ".to_string(),
            5.0,
            "expense".to_string(),
            "May".to_string(),
        );
        assert!(!bad.ok);
    }

    #[test]
    fn tracker_and_sign_out_scopes() {
        let user = Some(unique_user("tracker"));
        let first = tracker_toggle_period(user.clone(), 2026, 0, 5);
        assert_eq!(first.flag, Some(true), "{}", first.message);
        let second = tracker_toggle_period(user.clone(), 2026, 1, 2);
        assert_eq!(second.flag, Some(true), "{}", second.message);
        assert!(!tracker_toggle_period(user.clone(), 2026, 1, 30).ok);

        let snapshot = tracker_snapshot(user.clone());
        let value: serde_json::Value = serde_json::from_str(&snapshot.json).unwrap();
        assert_eq!(value["averageCycle"], 28);
        assert_eq!(value["history"][0]["label"], "February 2026");

        assert!(sign_out(user.clone()).ok);
        let tracker_after = tracker_snapshot(user.clone());
        let value: serde_json::Value = serde_json::from_str(&tracker_after.json).unwrap();
        assert_eq!(value["averageCycle"], 28);
        let profile = profile_snapshot(user);
        let value: serde_json::Value = serde_json::from_str(&profile.json).unwrap();
        assert!(value["profileImage"].is_null());
    }

    #[test]
    fn assistant_chat_rejects_blank_message_before_any_request() {
        let envelope = assistant_chat(r#"{"message":"  ","history":[]}"#.to_string());
        assert_eq!(envelope.status, 400);
        let body: serde_json::Value = serde_json::from_str(&envelope.body_json).unwrap();
        assert_eq!(body["error"], "Message is required");
    }

    fn unique_user(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}@example.com")
    }
}
