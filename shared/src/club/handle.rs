use serde::{Deserialize, Serialize};

use super::MemberPermissions;

/// Descriptor of a club creation.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewClubDescriptor {
    pub name: String,
    pub description: String,
    pub profile_pic: String,
    pub banner: Option<String>,
    #[serde(default)]
    pub is_available_for_registration: bool,
}

/// Descriptor of a club settings edit.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditClubDescriptor {
    pub name: Option<String>,
    pub description: Option<String>,
    pub profile_pic: Option<String>,
    pub banner: Option<String>,
    pub is_available_for_registration: Option<bool>,
}

/// Descriptor of a member addition.
#[derive(Serialize, Deserialize, Debug)]
pub struct NewMemberDescriptor {
    /// Id of the user to add.
    pub user: u64,
    pub role: String,
    #[serde(default)]
    pub rank: u32,
    /// Defaults to displaying the member on the public page.
    #[serde(default = "default_showcase")]
    pub showcase: bool,
    /// When absent, the preset bundle for `role` is applied.
    pub permissions: Option<MemberPermissions>,
}

fn default_showcase() -> bool {
    true
}

/// Descriptor of a member entry edit.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct EditMemberDescriptor {
    pub role: Option<String>,
    pub rank: Option<u32>,
    pub showcase: Option<bool>,
    pub permissions: Option<MemberPermissions>,
}

/// Descriptor of an announcement creation.
#[derive(Serialize, Deserialize, Debug)]
pub struct NewAnnouncementDescriptor {
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
}

/// Descriptor of an announcement edit.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct EditAnnouncementDescriptor {
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}
