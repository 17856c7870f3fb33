//! Persistence and authentication seams of the account contracts.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{config::DatabaseConfig, user::UserRecord, Environment};

mod database;
mod memory;

pub use database::DatabaseUserStore;
pub use memory::MemoryUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique nickname constraint rejected a write.
    #[error("nickname `{0}` is already taken")]
    DuplicateNickname(String),
    /// Anything else. Not recoverable by the caller.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hashes `password`, issues a token and persists a new active account.
    async fn create_user(&self, nickname: &str, password: &str) -> Result<UserRecord, StoreError>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Persists nickname, password hash, staff and active flags of an existing account.
    async fn save(&self, user: &UserRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// The matching active account, or `None` for an unknown nickname, a wrong
    /// password or a disabled account alike.
    async fn authenticate(
        &self,
        nickname: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, StoreError>;
}

#[async_trait]
impl<S: UserStore + ?Sized> Authenticator for S {
    async fn authenticate(
        &self,
        nickname: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let Some(user) = self.find_by_nickname(nickname).await? else {
            debug!(nickname, "Authentication failed: unknown nickname");
            return Ok(None);
        };
        if !user.is_active {
            debug!(nickname, "Authentication failed: account disabled");
            return Ok(None);
        }
        if !user.check_password(password) {
            debug!(nickname, "Authentication failed: password mismatch");
            return Ok(None);
        }
        Ok(Some(user))
    }
}

/// Picks the store for the environment. A configured database always wins.
pub async fn connect(
    environment: Environment,
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn UserStore>> {
    match database {
        Some(database) => {
            let connection = Database::connect(database.url.as_str())
                .await
                .context("Connecting to the user database")?;
            Migrator::up(&connection, None)
                .await
                .context("Migrating the user database")?;
            info!("Users are stored in the database");
            Ok(Arc::new(DatabaseUserStore::new(connection)))
        }
        None if environment.allows_memory_store() => {
            warn!("No database configured, users are kept in memory");
            Ok(Arc::new(MemoryUserStore::default()))
        }
        None => bail!("No `database.url` configured for {environment:?}"),
    }
}
