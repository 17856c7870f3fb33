use tracing::{info, warn};
use validator::Validate;

use super::{trim, ContractError};
use crate::{store::Authenticator, validation::FieldErrors};

const NICKNAME_REQUIRED: &str = "A nickname is required to login";
const PASSWORD_REQUIRED: &str = "A password is required to login";

/// The same for an unknown nickname, a wrong password and a disabled account.
pub const LOGIN_FAILED: &str = "A user with this nickname/password was not found";

/// Checks credentials and hands back the account's existing token.
pub async fn login<A: Authenticator + ?Sized>(
    authenticator: &A,
    mut input: api::Login,
) -> Result<api::LoggedIn, ContractError> {
    let mut errors = FieldErrors::default();

    trim(&mut input.nickname);
    trim(&mut input.password);
    errors.required("nickname", &mut input.nickname, NICKNAME_REQUIRED, NICKNAME_REQUIRED);
    errors.required("password", &mut input.password, PASSWORD_REQUIRED, PASSWORD_REQUIRED);
    if let Err(invalid) = input.validate() {
        errors.merge(&invalid);
    }

    let (Some(nickname), Some(password)) = (input.nickname, input.password) else {
        return Err(errors.into());
    };
    errors.check()?;

    match authenticator.authenticate(&nickname, &password).await? {
        Some(user) if user.is_active => {
            info!(id = %user.id(), nickname = %user.nickname, "User logged in");
            Ok(user.logged_in())
        }
        _ => {
            warn!(nickname = %nickname, "Login rejected");
            Err(FieldErrors::non_field(LOGIN_FAILED).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        store::{MemoryUserStore, UserStore},
        test_helper::{alice, store, ALICE_PASSWORD},
        validation::NON_FIELD_ERRORS,
    };

    fn input(nickname: Option<&str>, password: Option<&str>) -> api::Login {
        api::Login {
            nickname: nickname.map(Into::into),
            password: password.map(Into::into),
        }
    }

    fn invalid(result: Result<api::LoggedIn, ContractError>) -> FieldErrors {
        match result {
            Err(ContractError::Invalid(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn returns_stored_token(store: MemoryUserStore) {
        let alice = alice(&store).await;

        let logged_in = login(&store, input(Some("alice"), Some(ALICE_PASSWORD)))
            .await
            .unwrap();

        assert_eq!(logged_in.nickname, "alice");
        assert_eq!(logged_in.token, alice.token());

        let value = serde_json::to_value(&logged_in).unwrap();
        assert!(value.get("password").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_indistinguishable(store: MemoryUserStore) {
        alice(&store).await;
        store.create_user("carol", "carol's password").await.unwrap();
        let mut carol = store.find_by_nickname("carol").await.unwrap().unwrap();
        carol.is_active = false;
        store.save(&carol).await.unwrap();

        let unknown = invalid(login(&store, input(Some("mallory"), Some(ALICE_PASSWORD))).await);
        let wrong_password = invalid(login(&store, input(Some("alice"), Some("not her password"))).await);
        let disabled = invalid(login(&store, input(Some("carol"), Some("carol's password"))).await);

        let expected = FieldErrors::non_field(LOGIN_FAILED);
        assert_eq!(unknown, expected);
        assert_eq!(wrong_password, expected);
        assert_eq!(disabled, expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), Some(""))]
    #[case(Some("   "), Some(" "))]
    #[tokio::test]
    async fn both_fields_are_required(
        store: MemoryUserStore,
        #[case] nickname: Option<&str>,
        #[case] password: Option<&str>,
    ) {
        let errors = invalid(login(&store, input(nickname, password)).await);

        assert_eq!(errors.get("nickname"), Some([NICKNAME_REQUIRED.to_owned()].as_slice()));
        assert_eq!(errors.get("password"), Some([PASSWORD_REQUIRED.to_owned()].as_slice()));
        assert!(!errors.contains(NON_FIELD_ERRORS));
    }

    #[rstest]
    #[tokio::test]
    async fn length_rules_apply_before_authentication(store: MemoryUserStore) {
        alice(&store).await;

        let errors = invalid(login(&store, input(Some("al"), Some("short"))).await);

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "nickname": ["Ensure this field has at least 3 characters."],
                "password": ["Ensure this field has at least 8 characters."],
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn surrounding_whitespace_is_ignored(store: MemoryUserStore) {
        alice(&store).await;

        let password = format!("  {ALICE_PASSWORD}\t");
        let logged_in = login(&store, input(Some(" alice "), Some(password.as_str())))
            .await
            .unwrap();

        assert_eq!(logged_in.nickname, "alice");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_password_skips_authentication(store: MemoryUserStore) {
        alice(&store).await;

        let errors = invalid(login(&store, input(Some("alice"), None)).await);

        assert!(!errors.contains("nickname"));
        assert_eq!(errors.get("password"), Some([PASSWORD_REQUIRED.to_owned()].as_slice()));
    }
}
