use entity::user;
use sea_orm::{
    prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, EntityTrait, QueryFilter, SqlErr, TransactionTrait,
};

use super::UserRecord;
use crate::store::StoreError;

/// Insert a new user.
pub async fn create(connection: &DatabaseConnection, new_user: &UserRecord) -> Result<(), StoreError> {
    let txn = connection.begin().await.map_err(backend)?;

    user::Entity::insert(user::ActiveModel::from(user::Model::from(new_user.clone())))
        .exec(&txn)
        .await
        .map_err(|err| write_error(err, &new_user.nickname))?;

    txn.commit().await.map_err(backend)?;

    Ok(())
}

pub async fn get_by_nickname(
    connection: &DatabaseConnection,
    nickname: &str,
) -> Result<Option<UserRecord>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Nickname.eq(nickname))
        .one(connection)
        .await
        .map_err(backend)?
        .map(UserRecord::from))
}

pub async fn get_by_token(
    connection: &DatabaseConnection,
    token: &str,
) -> Result<Option<UserRecord>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Token.eq(token))
        .one(connection)
        .await
        .map_err(backend)?
        .map(UserRecord::from))
}

/// Write back the columns a user may change. Token and creation date are never touched.
pub async fn update(connection: &DatabaseConnection, changed: &UserRecord) -> Result<(), StoreError> {
    let model = user::ActiveModel {
        id: Unchanged(changed.id()),
        nickname: Set(changed.nickname.clone()),
        password: Set(changed.password_hash().to_owned()),
        is_staff: Set(changed.is_staff),
        is_active: Set(changed.is_active),
        ..Default::default()
    };

    model
        .update(connection)
        .await
        .map_err(|err| write_error(err, &changed.nickname))?;

    Ok(())
}

fn backend(err: DbErr) -> StoreError {
    StoreError::Backend(err.into())
}

fn write_error(err: DbErr, nickname: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(constraint)) if constraint.contains("nickname") => {
            StoreError::DuplicateNickname(nickname.into())
        }
        _ => backend(err),
    }
}
