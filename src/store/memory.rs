use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::user::UserRecord;

/// Keeps users in a map. Uniqueness is checked under the same lock as the write.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    fn users(&self) -> Result<MutexGuard<'_, HashMap<Uuid, UserRecord>>, StoreError> {
        self.users
            .lock()
            .map_err(|_| anyhow!("user store lock poisoned").into())
    }

    pub fn len(&self) -> usize {
        self.users().map(|users| users.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, nickname: &str, password: &str) -> Result<UserRecord, StoreError> {
        // Hash before taking the lock.
        let new_user = UserRecord::new(nickname, password);

        let mut users = self.users()?;
        if users.values().any(|user| user.nickname == nickname) {
            return Err(StoreError::DuplicateNickname(nickname.into()));
        }
        users.insert(new_user.id(), new_user.clone());

        Ok(new_user)
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users()?
            .values()
            .find(|user| user.nickname == nickname)
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users()?
            .values()
            .find(|user| user.token() == token)
            .cloned())
    }

    async fn save(&self, changed: &UserRecord) -> Result<(), StoreError> {
        let mut users = self.users()?;
        if users
            .values()
            .any(|user| user.id() != changed.id() && user.nickname == changed.nickname)
        {
            return Err(StoreError::DuplicateNickname(changed.nickname.clone()));
        }
        let Some(stored) = users.get_mut(&changed.id()) else {
            return Err(anyhow!("user {} does not exist", changed.id()).into());
        };
        stored.apply_changes(changed);

        Ok(())
    }
}
