//! Typed per-user document store.
//!
//! # Responsibility
//! - Define the key/value persistence contract used by services.
//! - Name every document a user owns and scope its key to that user.
//! - Serialize documents as JSON and tolerate corrupt payloads on read.
//!
//! # Invariants
//! - A payload that fails to parse loads as `None` and is logged, never
//!   surfaced to callers.
//! - Transport failures (SQLite errors) are surfaced as `StoreError`.
//! - Log lines carry document kinds and sizes, never payload contents.

mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use crate::db::DbError;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Scope used when nobody is signed in.
pub const GUEST_SCOPE: &str = "guest";

/// Store transport or encoding failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Owner of a set of documents: the signed-in e-mail or `guest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserScope(String);

impl UserScope {
    /// Scope for an optional signed-in identity; blank identities are guests.
    pub fn new(identity: Option<&str>) -> Self {
        match identity.map(str::trim) {
            Some(value) if !value.is_empty() => Self(value.to_string()),
            _ => Self::guest(),
        }
    }

    pub fn guest() -> Self {
        Self(GUEST_SCOPE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_SCOPE
    }
}

impl Display for UserScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document kinds a user owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    ProfileImage,
    PastChats,
    CalendarEvents,
    FinanceTransactions,
    Periods,
    Moods,
    MoodPalette,
}

impl StorageKey {
    /// Documents dropped when the user signs out.
    pub const SIGN_OUT_RESET: [StorageKey; 3] = [
        StorageKey::ProfileImage,
        StorageKey::PastChats,
        StorageKey::CalendarEvents,
    ];

    /// Short name used in log lines.
    pub fn kind(self) -> &'static str {
        match self {
            Self::ProfileImage => "profile_image",
            Self::PastChats => "past_chats",
            Self::CalendarEvents => "calendar_events",
            Self::FinanceTransactions => "finance_transactions",
            Self::Periods => "periods",
            Self::Moods => "moods",
            Self::MoodPalette => "mood_palette",
        }
    }

    /// Physical key of this document for `scope`.
    pub fn for_user(self, scope: &UserScope) -> String {
        let user = scope.as_str();
        match self {
            Self::ProfileImage => format!("profile_image_{user}"),
            Self::PastChats => format!("past_chats_{user}"),
            Self::CalendarEvents => format!("avecma_calendar_events_v1_{user}"),
            Self::FinanceTransactions => format!("avec-ma-finance-v4_{user}"),
            Self::Periods => format!("{user}_periods"),
            Self::Moods => format!("{user}_moods"),
            Self::MoodPalette => format!("{user}_mood-palette"),
        }
    }
}

/// Raw key/value persistence plus typed JSON helpers.
pub trait KvStore {
    /// Reads one raw payload.
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>>;

    /// Inserts or replaces one raw payload owned by `scope`.
    fn put_raw(&self, key: &str, scope: &str, value: &str) -> StoreResult<()>;

    /// Deletes one payload; returns whether it existed.
    fn remove_raw(&self, key: &str) -> StoreResult<bool>;

    /// Physical keys owned by `scope`, sorted.
    fn keys_for_scope(&self, scope: &str) -> StoreResult<Vec<String>>;

    /// Loads and decodes one document.
    ///
    /// Corrupt payloads are logged and reported as missing.
    fn load<T: DeserializeOwned>(
        &self,
        scope: &UserScope,
        key: StorageKey,
    ) -> StoreResult<Option<T>>
    where
        Self: Sized,
    {
        let Some(raw) = self.get_raw(&key.for_user(scope))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    "event=store_load module=store status=corrupt kind={} bytes={} error_line={} error_column={}",
                    key.kind(),
                    raw.len(),
                    err.line(),
                    err.column()
                );
                Ok(None)
            }
        }
    }

    /// Loads one document, falling back to its empty default.
    fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        scope: &UserScope,
        key: StorageKey,
    ) -> StoreResult<T>
    where
        Self: Sized,
    {
        Ok(self.load(scope, key)?.unwrap_or_default())
    }

    /// Encodes and writes one document.
    fn save<T: Serialize + ?Sized>(
        &self,
        scope: &UserScope,
        key: StorageKey,
        value: &T,
    ) -> StoreResult<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;
        self.put_raw(&key.for_user(scope), scope.as_str(), &raw)
    }

    /// Deletes one document.
    fn remove(&self, scope: &UserScope, key: StorageKey) -> StoreResult<bool>
    where
        Self: Sized,
    {
        self.remove_raw(&key.for_user(scope))
    }
}

#[cfg(test)]
mod tests {
    use super::{StorageKey, UserScope};

    #[test]
    fn keys_follow_per_user_conventions() {
        let scope = UserScope::new(Some(" mama@example.com "));
        assert_eq!(
            StorageKey::CalendarEvents.for_user(&scope),
            "avecma_calendar_events_v1_mama@example.com"
        );
        assert_eq!(
            StorageKey::FinanceTransactions.for_user(&scope),
            "avec-ma-finance-v4_mama@example.com"
        );
        assert_eq!(
            StorageKey::Periods.for_user(&scope),
            "mama@example.com_periods"
        );
    }

    #[test]
    fn blank_identity_is_guest() {
        assert!(UserScope::new(None).is_guest());
        assert!(UserScope::new(Some("  ")).is_guest());
        assert_eq!(StorageKey::Moods.for_user(&UserScope::guest()), "guest_moods");
    }
}
