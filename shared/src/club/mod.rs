pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six independent booleans gating club-scoped write actions.
///
/// These stored flags are the source of truth for authorization,
/// decoupled from the free-text role label on the member entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPermissions {
    #[serde(default)]
    pub can_add_members: bool,
    #[serde(default)]
    pub can_remove_members: bool,
    #[serde(default)]
    pub can_publish_announcements: bool,
    #[serde(default)]
    pub can_publish_blogs: bool,
    #[serde(default)]
    pub can_manage_club_settings: bool,
    #[serde(default)]
    pub can_manage_permissions: bool,
}

impl MemberPermissions {
    /// Every flag granted.
    pub const ALL: Self = Self {
        can_add_members: true,
        can_remove_members: true,
        can_publish_announcements: true,
        can_publish_blogs: true,
        can_manage_club_settings: true,
        can_manage_permissions: true,
    };

    /// Every flag denied.
    pub const NONE: Self = Self {
        can_add_members: false,
        can_remove_members: false,
        can_publish_announcements: false,
        can_publish_blogs: false,
        can_manage_club_settings: false,
        can_manage_permissions: false,
    };
}

/// A (club, user) association carrying a role label, rank,
/// showcase flag and a permissions bitmap.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Id of the associated user.
    pub user: u64,
    /// Free-text role label (ex. "President"), advisory only.
    pub role: String,
    /// Numeric ordering hint, not used in authorization decisions.
    pub rank: u32,
    /// Whether this member appears on the club's public page.
    pub showcase: bool,
    pub permissions: MemberPermissions,
}

/// An announcement embedded in a club.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
    pub author: AnnouncementAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author of an announcement: the posting user and their
/// member role label at the time of posting.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AnnouncementAuthor {
    pub user: u64,
    pub role: String,
}

/// A named role bundle used by membership UIs to prefill permissions.
pub struct RolePreset {
    pub title: &'static str,
    pub level: u32,
    pub permissions: MemberPermissions,
}

/// Preset bundles for the six well-known member roles.
pub static ROLE_PRESETS: [RolePreset; 6] = [
    RolePreset {
        title: "President",
        level: 10,
        permissions: MemberPermissions::ALL,
    },
    RolePreset {
        title: "Vice President",
        level: 9,
        permissions: MemberPermissions::ALL,
    },
    RolePreset {
        title: "Secretary",
        level: 8,
        permissions: MemberPermissions::ALL,
    },
    RolePreset {
        title: "Treasurer",
        level: 8,
        permissions: MemberPermissions::ALL,
    },
    RolePreset {
        title: "Active Member",
        level: 7,
        permissions: MemberPermissions {
            can_manage_club_settings: true,
            ..MemberPermissions::NONE
        },
    },
    RolePreset {
        title: "General Member",
        level: 5,
        permissions: MemberPermissions::NONE,
    },
];

/// Permissions preset for the given role label.
///
/// An unrecognized label maps to all flags denied.
pub fn preset_permissions(role: &str) -> MemberPermissions {
    ROLE_PRESETS
        .iter()
        .find(|preset| preset.title == role)
        .map(|preset| preset.permissions)
        .unwrap_or(MemberPermissions::NONE)
}
