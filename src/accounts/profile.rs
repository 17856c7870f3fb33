use tracing::info;
use validator::Validate;

use super::{trim, ContractError};
use crate::{
    store::UserStore,
    user::UserRecord,
    validation::{message, FieldErrors},
};

/// Applies a partial update to `user` and persists it.
///
/// Only nickname, password and the staff flag are writable. Sending `token`
/// or `created_datetime` is a field error. A new password is hashed before it
/// reaches the record.
pub async fn update_profile<S: UserStore + ?Sized>(
    store: &S,
    mut user: UserRecord,
    mut input: api::ProfileUpdate,
) -> Result<api::Profile, ContractError> {
    let mut errors = FieldErrors::default();

    if input.token.is_some() {
        errors.add("token", message::READ_ONLY);
    }
    if input.created_datetime.is_some() {
        errors.add("created_datetime", message::READ_ONLY);
    }

    trim(&mut input.nickname);
    trim(&mut input.password);
    errors.not_blank("nickname", &mut input.nickname);
    errors.not_blank("password", &mut input.password);
    if let Err(invalid) = input.validate() {
        errors.merge(&invalid);
    }

    if let Some(nickname) = &input.nickname {
        if let Some(other) = store.find_by_nickname(nickname).await? {
            if other.id() != user.id() {
                errors.add("nickname", message::UNIQUE);
            }
        }
    }

    errors.check()?;

    merge(&mut user, input);
    store.save(&user).await?;
    info!(id = %user.id(), nickname = %user.nickname, "Profile updated");

    Ok(user.profile())
}

/// The writable fields, one by one.
fn merge(user: &mut UserRecord, update: api::ProfileUpdate) {
    let api::ProfileUpdate {
        nickname,
        password,
        is_staff,
        token: _,
        created_datetime: _,
    } = update;

    if let Some(nickname) = nickname {
        user.nickname = nickname;
    }
    if let Some(is_staff) = is_staff {
        user.is_staff = is_staff;
    }
    if let Some(password) = password {
        user.set_password(&password);
    }
}
