use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use rstest::fixture;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{
    store::{MemoryUserStore, UserStore},
    user::UserRecord,
};

pub const ALICE_PASSWORD: &str = "alice's password";

/// A migrated, private in-memory SQLite database.
#[fixture]
pub async fn database() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // Every pooled connection would get its own empty database otherwise.
    options.max_connections(1).sqlx_logging(false);

    let database = Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

#[fixture]
pub fn store() -> MemoryUserStore {
    MemoryUserStore::default()
}

/// Signs up `alice` directly through the store.
pub async fn alice(store: &impl UserStore) -> UserRecord {
    store
        .create_user("alice", ALICE_PASSWORD)
        .await
        .expect("alice signs up")
}
