//! User model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user signed up as. The same email may exist once per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Driver,
    Passenger,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Driver => write!(f, "driver"),
            UserRole::Passenger => write!(f, "passenger"),
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(UserRole::Driver),
            "passenger" => Ok(UserRole::Passenger),
            _ => Err(()),
        }
    }
}

/// Stored user record.
///
/// The password is kept verbatim (demo scope, no real auth); it is never
/// included in API responses, which use [`Profile`] or a response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Id of the form `"{user_type}-{creation millis}"`
    pub id: String,
    pub user_type: UserRole,
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

/// Fields supplied at signup; the id is derived by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub user_type: UserRole,
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

/// Public projection of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_type: UserRole,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Profile {
            id: user.id.clone(),
            user_type: user.user_type,
            full_name: user.name.clone(),
            avatar_url: None,
            mobile_number: Some(user.mobile.clone()),
        }
    }
}
