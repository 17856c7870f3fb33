//! Request and response bodies of the accounts API.
//!
//! Length rules live here as `validator` attributes. Presence and blank checks
//! depend on the endpoint and are applied by the contracts themselves.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Validate, Default, Serialize, Deserialize, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 3, max = 255))]
    pub nickname: Option<String>,
    /// Write only, never part of a response.
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SignedUp {
    pub id: Uuid,
    pub nickname: String,
    pub token: String,
}

#[derive(Debug, Validate, Default, Serialize, Deserialize, ToSchema)]
pub struct Login {
    #[validate(length(min = 3, max = 255))]
    pub nickname: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LoggedIn {
    pub nickname: String,
    pub token: String,
}

/// A partial profile update. Absent keys leave the stored value untouched.
#[derive(Debug, Validate, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    #[validate(length(min = 3, max = 255))]
    pub nickname: Option<String>,
    /// A `null` password is treated like an absent one.
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub is_staff: Option<bool>,
    /// Read only, rejected when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub token: Option<serde_json::Value>,
    /// Read only, rejected when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_datetime: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub nickname: String,
    pub is_staff: bool,
    pub created_datetime: DateTime<FixedOffset>,
    pub token: String,
}
