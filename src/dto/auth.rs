use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub answer: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
    pub answer: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Any subset of the profile fields; absent ones keep their stored value.
/// `email` is accepted but never changes.
#[derive(Deserialize, Serialize, Debug, Default, ToSchema)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePayload {
    #[serde(rename = "updatedUser")]
    pub updated_user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub data: Vec<User>,
}

/// Returns the value when present and not blank.
pub(crate) fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
