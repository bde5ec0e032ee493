//! Account-level documents: profile image, past chat archive, sign-out.
//!
//! # Responsibility
//! - Read and replace the user's profile image.
//! - Archive chat summaries newest first.
//! - Drop the per-user documents that do not survive sign-out.
//!
//! # Invariants
//! - Sign-out removes exactly `StorageKey::SIGN_OUT_RESET`; ledger, periods,
//!   moods and palette stay on the device.

use crate::model::chat::PastChat;
use crate::service::ServiceResult;
use crate::store::{KvStore, StorageKey, UserScope};
use log::info;

/// Profile service facade over a store implementation.
pub struct ProfileService<S: KvStore> {
    store: S,
    scope: UserScope,
}

impl<S: KvStore> ProfileService<S> {
    pub fn new(store: S, scope: UserScope) -> Self {
        Self { store, scope }
    }

    pub fn profile_image(&self) -> ServiceResult<Option<String>> {
        Ok(self.store.load(&self.scope, StorageKey::ProfileImage)?)
    }

    /// Stores a data URL; a blank value removes the image.
    pub fn set_profile_image(&self, data_url: &str) -> ServiceResult<()> {
        let data_url = data_url.trim();
        if data_url.is_empty() {
            self.store.remove(&self.scope, StorageKey::ProfileImage)?;
            return Ok(());
        }
        self.store
            .save(&self.scope, StorageKey::ProfileImage, data_url)?;
        info!(
            "event=profile_image_set module=service status=ok bytes={}",
            data_url.len()
        );
        Ok(())
    }

    /// Archived chats, newest first.
    pub fn past_chats(&self) -> ServiceResult<Vec<PastChat>> {
        Ok(self
            .store
            .load_or_default(&self.scope, StorageKey::PastChats)?)
    }

    /// Prepends one chat summary to the archive and returns it.
    pub fn archive_chat(&self, title: &str, summary: &str) -> ServiceResult<PastChat> {
        let mut chats = self.past_chats()?;
        let chat = PastChat::new(title.trim(), summary.trim());
        chats.insert(0, chat.clone());
        self.store.save(&self.scope, StorageKey::PastChats, &chats)?;
        info!(
            "event=chat_archive module=service status=ok chats={}",
            chats.len()
        );
        Ok(chat)
    }

    /// Removes the documents dropped on sign-out; returns how many existed.
    pub fn sign_out_reset(&self) -> ServiceResult<usize> {
        let mut removed = 0;
        for key in StorageKey::SIGN_OUT_RESET {
            if self.store.remove(&self.scope, key)? {
                removed += 1;
            }
        }
        info!(
            "event=sign_out_reset module=service status=ok guest={} removed={}",
            self.scope.is_guest(),
            removed
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileService;
    use crate::store::{KvStore, MemoryStore, StorageKey, UserScope};

    #[test]
    fn archive_keeps_newest_first() {
        let service = ProfileService::new(MemoryStore::new(), UserScope::guest());
        service.archive_chat("Monday", "felt tired").unwrap();
        let latest = service.archive_chat("Tuesday", "better sleep").unwrap();
        let chats = service.past_chats().unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].id, latest.id);
    }

    #[test]
    fn sign_out_keeps_tracker_and_ledger_documents() {
        let scope = UserScope::new(Some("mama@example.com"));
        let service = ProfileService::new(MemoryStore::new(), scope.clone());
        service.set_profile_image("data:image/png;base64,AAAA").unwrap();
        service.archive_chat("t", "s").unwrap();
        service
            .store
            .put_raw(&StorageKey::Periods.for_user(&scope), scope.as_str(), "{}")
            .unwrap();

        assert_eq!(service.sign_out_reset().unwrap(), 2);
        assert_eq!(service.profile_image().unwrap(), None);
        assert!(service.past_chats().unwrap().is_empty());
        assert_eq!(
            service.store.keys_for_scope(scope.as_str()).unwrap(),
            vec!["mama@example.com_periods".to_string()]
        );
    }
}
