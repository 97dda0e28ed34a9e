use serde::{Deserialize, Serialize};

use super::UserRole;

/// Descriptor of a self-service signup.
#[derive(Serialize, Deserialize, Debug)]
pub struct SignupDescriptor {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Descriptor of a login request.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDescriptor {
    pub email: String,
    pub password: String,
}

/// Descriptor of an administrative user creation.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MakeUserDescriptor {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    pub profile_pic: Option<String>,
}

/// Descriptor of a self-service profile edit.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditUserDescriptor {
    pub name: Option<String>,
    pub profile_pic: Option<String>,
    pub password: Option<String>,
}

/// Descriptor of an administrative user edit.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ManageUserDescriptor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub profile_pic: Option<String>,
}
