//! Session Holder: the single signed-in account, mirrored to durable storage.

use tracing::{debug, warn};

use domain::{AccountResponse, SESSION_STORAGE_KEY};

use crate::error::SessionError;
use crate::storage::SessionStorage;

/// Holds at most one account. Setting replaces, never merges.
pub struct SessionHolder<S> {
    storage: S,
    key: String,
    current: Option<AccountResponse>,
}

impl<S: SessionStorage> SessionHolder<S> {
    /// Holder over the standard session slot
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: None,
        }
    }

    /// Load the persisted account.
    ///
    /// A value that does not parse is deleted and reported as no session.
    pub async fn rehydrate(&mut self) -> Result<Option<AccountResponse>, SessionError> {
        let Some(raw) = self.storage.read(&self.key).await? else {
            self.current = None;
            return Ok(None);
        };

        match serde_json::from_str::<AccountResponse>(&raw) {
            Ok(account) => {
                debug!(user_id = %account.id, "Session rehydrated");
                self.current = Some(account.clone());
                Ok(Some(account))
            }
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                self.storage.remove(&self.key).await?;
                self.current = None;
                Ok(None)
            }
        }
    }

    pub async fn set(&mut self, account: AccountResponse) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&account)?;
        self.storage.write(&self.key, &raw).await?;
        self.current = Some(account);
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.storage.remove(&self.key).await
    }

    pub fn current(&self) -> Option<&AccountResponse> {
        self.current.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use domain::UserRole;
    use uuid::Uuid;

    fn account(email: &str) -> AccountResponse {
        AccountResponse {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: None,
            role: UserRole::Owner,
        }
    }

    #[tokio::test]
    async fn test_empty_slot_rehydrates_to_none() {
        let mut holder = SessionHolder::new(MemoryStorage::new());
        assert_eq!(holder.rehydrate().await.unwrap(), None);
        assert!(holder.current().is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_previous_account() {
        let mut holder = SessionHolder::new(MemoryStorage::new());
        holder.set(account("alice@x.com")).await.unwrap();
        let bob = account("bob@x.com");
        holder.set(bob.clone()).await.unwrap();

        assert_eq!(holder.current(), Some(&bob));
        assert_eq!(holder.rehydrate().await.unwrap(), Some(bob));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_removed() {
        let storage = MemoryStorage::new();
        storage.write(SESSION_STORAGE_KEY, "{not json").await.unwrap();
        let mut holder = SessionHolder::new(storage);

        assert_eq!(holder.rehydrate().await.unwrap(), None);
        assert_eq!(holder.storage().read(SESSION_STORAGE_KEY).await.unwrap(), None);
        // Nothing left to retry
        assert_eq!(holder.rehydrate().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_empties_slot_and_mirror() {
        let mut holder = SessionHolder::new(MemoryStorage::new());
        holder.set(account("alice@x.com")).await.unwrap();
        holder.clear().await.unwrap();

        assert!(holder.current().is_none());
        assert_eq!(holder.rehydrate().await.unwrap(), None);
    }
}
