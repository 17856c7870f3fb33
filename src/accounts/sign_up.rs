use tracing::info;
use validator::Validate;

use super::{trim, ContractError};
use crate::{
    store::UserStore,
    validation::{message, FieldErrors},
};

/// Creates an account.
///
/// Both fields are trimmed. The nickname must be 3 to 255 characters and not
/// taken yet. The password needs at least 8 characters and is only stored hashed.
pub async fn sign_up<S: UserStore + ?Sized>(
    store: &S,
    mut input: api::SignUp,
) -> Result<api::SignedUp, ContractError> {
    let mut errors = FieldErrors::default();

    trim(&mut input.nickname);
    trim(&mut input.password);
    errors.required("nickname", &mut input.nickname, message::REQUIRED, message::BLANK);
    errors.required("password", &mut input.password, message::REQUIRED, message::BLANK);
    if let Err(invalid) = input.validate() {
        errors.merge(&invalid);
    }

    if let Some(nickname) = &input.nickname {
        if store.find_by_nickname(nickname).await?.is_some() {
            errors.add("nickname", message::UNIQUE);
        }
    }

    match (input.nickname, input.password) {
        (Some(nickname), Some(password)) if errors.is_empty() => {
            let user = store.create_user(&nickname, &password).await?;
            info!(id = %user.id(), nickname = %user.nickname, "User signed up");
            Ok(user.signed_up())
        }
        _ => Err(errors.into()),
    }
}
