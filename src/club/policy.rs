//! The authorization policy evaluator.
//!
//! Every club-scoped handler funnels its permission decision through
//! [`authorize`], a pure function over data the handler has already
//! fetched. Nothing here touches storage or caches a decision.

use clubhub_shared::user::UserRole;

use super::Club;
use crate::Error;

/// A club-scoped action submitted for authorization.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    AddMembers,
    RemoveMember {
        /// The user whose member entry would be removed.
        target: u64,
    },
    ManagePermissions,
    PublishAnnouncements,
    PublishBlogs,
    ManageSettings,
    /// Read-style access to member-only content.
    ViewInternal,
    /// Deleting the club itself.
    Delete,
}

/// The requesting principal: identity plus global role.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Actor {
    pub id: u64,
    pub role: UserRole,
}

impl Actor {
    #[inline]
    fn is_superuser(self) -> bool {
        self.role == UserRole::Superuser
    }
}

/// Decide whether `actor` may perform `action` on `club`.
///
/// The self-removal guard outranks the superuser override: nobody
/// removes their own member entry, superusers included. Past that,
/// a superuser is permitted unconditionally, club deletion needs the
/// superuser role, read-style access needs a member entry, and every
/// write action needs its stored permission flag on that entry.
pub fn authorize(actor: Actor, club: &Club, action: Action) -> Result<(), Error> {
    if let Action::RemoveMember { target } = action {
        if target == actor.id {
            return Err(Error::SelfRemoval);
        }
    }

    if actor.is_superuser() {
        return Ok(());
    }

    if action == Action::Delete {
        return Err(Error::PermissionDenied);
    }

    let Some(member) = club.member(actor.id) else {
        return Err(Error::PermissionDenied);
    };

    let permitted = match action {
        Action::AddMembers => member.permissions.can_add_members,
        Action::RemoveMember { .. } => member.permissions.can_remove_members,
        Action::ManagePermissions => member.permissions.can_manage_permissions,
        Action::PublishAnnouncements => member.permissions.can_publish_announcements,
        Action::PublishBlogs => member.permissions.can_publish_blogs,
        Action::ManageSettings => member.permissions.can_manage_club_settings,
        Action::ViewInternal => true,
        Action::Delete => unreachable!("handled above"),
    };

    if permitted {
        Ok(())
    } else {
        Err(Error::PermissionDenied)
    }
}
