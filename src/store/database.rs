use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::{StoreError, UserStore};
use crate::user::{users, UserRecord};

/// Users in a sea-orm database, schema from the `migration` crate.
#[derive(Debug, Clone)]
pub struct DatabaseUserStore {
    connection: DatabaseConnection,
}

impl DatabaseUserStore {
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl UserStore for DatabaseUserStore {
    async fn create_user(&self, nickname: &str, password: &str) -> Result<UserRecord, StoreError> {
        let new_user = UserRecord::new(nickname, password);
        users::create(&self.connection, &new_user).await?;
        Ok(new_user)
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<UserRecord>, StoreError> {
        users::get_by_nickname(&self.connection, nickname).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        users::get_by_token(&self.connection, token).await
    }

    async fn save(&self, user: &UserRecord) -> Result<(), StoreError> {
        users::update(&self.connection, user).await
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use anyhow::Result;
    use rstest::*;

    use super::*;
    use crate::{store::Authenticator, test_helper::database};

    #[rstest]
    #[tokio::test]
    async fn authenticates_against_stored_hash(
        database: impl Future<Output = Result<DatabaseConnection>>,
    ) -> Result<()> {
        let store = DatabaseUserStore::new(database.await?);
        let alice = store.create_user("alice", "alice password").await?;

        let authenticated = store.authenticate("alice", "alice password").await?;
        assert_eq!(authenticated, Some(alice));
        assert_eq!(store.authenticate("alice", "wrong password").await?, None);

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_account_does_not_authenticate(
        database: impl Future<Output = Result<DatabaseConnection>>,
    ) -> Result<()> {
        let store = DatabaseUserStore::new(database.await?);
        let mut alice = store.create_user("alice", "alice password").await?;
        alice.is_active = false;
        store.save(&alice).await?;

        assert_eq!(store.authenticate("alice", "alice password").await?, None);
        Ok(())
    }
}
