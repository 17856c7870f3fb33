use std::fmt;

use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use entity::user;
use uuid::Uuid;

/// A chat account as the contracts see it.
///
/// The password hash, the token and the creation date cannot be assigned
/// from outside: the hash only changes through [`UserRecord::set_password`],
/// the other two are fixed when the record is created.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    id: Uuid,
    pub nickname: String,
    password: String,
    token: String,
    pub is_staff: bool,
    pub is_active: bool,
    created_datetime: DateTime<FixedOffset>,
}

impl UserRecord {
    /// A fresh, active, non-staff account with a newly issued token.
    pub fn new(nickname: &str, password: &str) -> Self {
        let mut user = Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            password: String::new(),
            token: issue_token(),
            is_staff: false,
            is_active: true,
            // Postgres keeps microseconds.
            created_datetime: Utc::now().trunc_subsecs(6).into(),
        };
        user.set_password(password);
        user
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn created_datetime(&self) -> DateTime<FixedOffset> {
        self.created_datetime
    }

    pub fn password_hash(&self) -> &str {
        &self.password
    }

    /// Hashes `plaintext` and replaces the stored hash.
    pub fn set_password(&mut self, plaintext: &str) {
        self.password = password_auth::generate_hash(plaintext);
    }

    pub fn check_password(&self, plaintext: &str) -> bool {
        password_auth::verify_password(plaintext, &self.password).is_ok()
    }

    /// Copies the writable columns of `changed`. Token and creation date stay.
    pub(crate) fn apply_changes(&mut self, changed: &UserRecord) {
        self.nickname.clone_from(&changed.nickname);
        self.password.clone_from(&changed.password);
        self.is_staff = changed.is_staff;
        self.is_active = changed.is_active;
    }

    pub fn signed_up(&self) -> api::SignedUp {
        api::SignedUp {
            id: self.id,
            nickname: self.nickname.clone(),
            token: self.token.clone(),
        }
    }

    pub fn logged_in(&self) -> api::LoggedIn {
        api::LoggedIn {
            nickname: self.nickname.clone(),
            token: self.token.clone(),
        }
    }

    pub fn profile(&self) -> api::Profile {
        api::Profile {
            nickname: self.nickname.clone(),
            is_staff: self.is_staff,
            created_datetime: self.created_datetime,
            token: self.token.clone(),
        }
    }
}

/// 32 hex characters, unique per account.
fn issue_token() -> String {
    Uuid::new_v4().simple().to_string()
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("is_staff", &self.is_staff)
            .field("is_active", &self.is_active)
            .field("created_datetime", &self.created_datetime)
            .finish_non_exhaustive()
    }
}

impl From<user::Model> for UserRecord {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            nickname: model.nickname,
            password: model.password,
            token: model.token,
            is_staff: model.is_staff,
            is_active: model.is_active,
            created_datetime: model.created_datetime,
        }
    }
}

impl From<UserRecord> for user::Model {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            nickname: record.nickname,
            password: record.password,
            token: record.token,
            is_staff: record.is_staff,
            is_active: record.is_active,
            created_datetime: record.created_datetime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_hashes_password_and_issues_token() {
        let user = UserRecord::new("alice", "correct horse");

        assert_ne!(user.password_hash(), "correct horse");
        assert!(user.check_password("correct horse"));
        assert!(!user.check_password("wrong horse"));
        assert_eq!(user.token().len(), 32);
        assert!(user.is_active);
        assert!(!user.is_staff);
    }

    #[test]
    fn set_password_replaces_hash() {
        let mut user = UserRecord::new("alice", "correct horse");
        let old_hash = user.password_hash().to_owned();

        user.set_password("newpass123");

        assert_ne!(user.password_hash(), old_hash);
        assert!(user.check_password("newpass123"));
        assert!(!user.check_password("correct horse"));
    }

    #[test]
    fn debug_output_omits_secrets() {
        let user = UserRecord::new("alice", "correct horse");
        let debug = format!("{user:?}");

        assert!(debug.contains("alice"));
        assert!(!debug.contains(user.password_hash()));
        assert!(!debug.contains(user.token()));
    }
}
