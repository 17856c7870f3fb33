//! Sign-up, login and profile update.
//!
//! Each contract validates its whole input first, collecting every field
//! error, and only then talks to the store. None of them keeps state between
//! calls.

use thiserror::Error;

use crate::{
    store::StoreError,
    validation::{message, FieldErrors},
};

mod login;
mod profile;
mod sign_up;

pub use login::{login, LOGIN_FAILED};
pub use profile::update_profile;
pub use sign_up::sign_up;

#[derive(Debug, Error)]
pub enum ContractError {
    /// User correctable, rendered as a 400 with the collected errors.
    #[error("invalid input: {0:?}")]
    Invalid(FieldErrors),
    /// The store failed. Propagated as is.
    #[error(transparent)]
    Store(anyhow::Error),
}

impl From<FieldErrors> for ContractError {
    fn from(errors: FieldErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl From<StoreError> for ContractError {
    fn from(error: StoreError) -> Self {
        match error {
            // Lost a race against a concurrent write of the same nickname.
            StoreError::DuplicateNickname(_) => {
                Self::Invalid(FieldErrors::single("nickname", message::UNIQUE))
            }
            StoreError::Backend(error) => Self::Store(error),
        }
    }
}

fn trim(value: &mut Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use super::*;
    use crate::{respond, store::UserStore, user::UserRecord};

    /// Finds nothing, then fails every write the way the store does.
    struct FailingWrites(fn() -> StoreError);

    #[async_trait]
    impl UserStore for FailingWrites {
        async fn create_user(&self, _: &str, _: &str) -> Result<UserRecord, StoreError> {
            Err((self.0)())
        }

        async fn find_by_nickname(&self, _: &str) -> Result<Option<UserRecord>, StoreError> {
            Ok(None)
        }

        async fn find_by_token(&self, _: &str) -> Result<Option<UserRecord>, StoreError> {
            Ok(None)
        }

        async fn save(&self, _: &UserRecord) -> Result<(), StoreError> {
            Err((self.0)())
        }
    }

    fn taken() -> StoreError {
        StoreError::DuplicateNickname("bob".into())
    }

    fn outage() -> StoreError {
        StoreError::Backend(anyhow!("connection reset by peer"))
    }

    fn sign_up_input() -> api::SignUp {
        api::SignUp {
            nickname: Some("bob".into()),
            password: Some("bob's password".into()),
        }
    }

    fn rename_input() -> api::ProfileUpdate {
        api::ProfileUpdate {
            nickname: Some("bob".into()),
            ..Default::default()
        }
    }

    fn unique_violation<T: std::fmt::Debug>(result: Result<T, ContractError>) {
        match result {
            Err(ContractError::Invalid(errors)) => assert_eq!(
                serde_json::to_value(&errors).unwrap(),
                json!({ "nickname": [message::UNIQUE] })
            ),
            other => panic!("expected a nickname error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn lost_race_is_a_nickname_error() {
        let store = FailingWrites(taken);

        unique_violation(sign_up(&store, sign_up_input()).await);
        let alice = UserRecord::new("alice", "alice's password");
        unique_violation(update_profile(&store, alice, rename_input()).await);
    }

    #[tokio::test]
    async fn store_outage_is_not_a_field_error() {
        let store = FailingWrites(outage);

        let result = sign_up(&store, sign_up_input()).await;
        assert!(matches!(result, Err(ContractError::Store(_))));

        let alice = UserRecord::new("alice", "alice's password");
        let result = update_profile(&store, alice, rename_input()).await;
        assert!(matches!(result, Err(ContractError::Store(_))));
    }

    #[tokio::test]
    async fn store_outage_renders_without_details() {
        let store = FailingWrites(outage);

        let response = match respond::contract(
            StatusCode::CREATED,
            sign_up(&store, sign_up_input()).await,
        ) {
            Ok(response) => response,
            Err(error) => error.into_response(),
        };

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("connection reset"));
    }
}
