//! Unit tests over the policy evaluator, no HTTP involved.

use crate::club::policy::{authorize, Action, Actor};
use crate::club::{preset_permissions, MemberPermissions};
use crate::user::UserRole;
use crate::Error;

use super::*;

const WRITE_ACTIONS: [Action; 6] = [
    Action::AddMembers,
    Action::RemoveMember { target: 0 },
    Action::ManagePermissions,
    Action::PublishAnnouncements,
    Action::PublishBlogs,
    Action::ManageSettings,
];

fn actor(id: u64, role: UserRole) -> Actor {
    Actor { id, role }
}

#[test]
fn superuser_bypasses_membership() {
    let state = state();
    let club_id = seed_club(&state, "Any Club", Vec::new());

    state
        .clubs
        .with(club_id, |club| {
            let admin = actor(1, UserRole::Superuser);
            for action in WRITE_ACTIONS {
                assert!(authorize(admin, club, action).is_ok());
            }
            assert!(authorize(admin, club, Action::ViewInternal).is_ok());
            assert!(authorize(admin, club, Action::Delete).is_ok());
        })
        .unwrap();
}

#[test]
fn non_member_denied_everything_but_public() {
    let state = state();
    let club_id = seed_club(&state, "Any Club", Vec::new());

    state
        .clubs
        .with(club_id, |club| {
            let stranger = actor(1, UserRole::User);
            for action in WRITE_ACTIONS {
                assert!(matches!(
                    authorize(stranger, club, action),
                    Err(Error::PermissionDenied)
                ));
            }
            assert!(matches!(
                authorize(stranger, club, Action::ViewInternal),
                Err(Error::PermissionDenied)
            ));
        })
        .unwrap();
}

#[test]
fn flags_decide_independently_of_the_role_label() {
    let state = state();

    // a "General Member" label carrying a single granted flag
    let permissions = MemberPermissions {
        can_add_members: true,
        ..MemberPermissions::NONE
    };
    let club_id = seed_club(&state, "Any Club", vec![member(7, permissions)]);

    state
        .clubs
        .with(club_id, |club| {
            let requester = actor(7, UserRole::User);
            assert!(authorize(requester, club, Action::AddMembers).is_ok());
            for action in WRITE_ACTIONS {
                if action != Action::AddMembers {
                    assert!(authorize(requester, club, action).is_err());
                }
            }
            // membership alone grants read access
            assert!(authorize(requester, club, Action::ViewInternal).is_ok());
        })
        .unwrap();
}

#[test]
fn self_removal_always_refused() {
    let state = state();
    let club_id = seed_club(&state, "Any Club", vec![member(7, MemberPermissions::ALL)]);

    state
        .clubs
        .with(club_id, |club| {
            let requester = actor(7, UserRole::User);
            assert!(matches!(
                authorize(requester, club, Action::RemoveMember { target: 7 }),
                Err(Error::SelfRemoval)
            ));

            // the guard fires before the superuser override
            let admin = actor(9, UserRole::Superuser);
            assert!(matches!(
                authorize(admin, club, Action::RemoveMember { target: 9 }),
                Err(Error::SelfRemoval)
            ));
            assert!(authorize(admin, club, Action::RemoveMember { target: 7 }).is_ok());
        })
        .unwrap();
}

#[test]
fn delete_never_satisfiable_club_level() {
    let state = state();
    let club_id = seed_club(&state, "Any Club", vec![member(7, MemberPermissions::ALL)]);

    state
        .clubs
        .with(club_id, |club| {
            assert!(matches!(
                authorize(actor(7, UserRole::User), club, Action::Delete),
                Err(Error::PermissionDenied)
            ));
        })
        .unwrap();
}

#[test]
fn role_presets() {
    for title in ["President", "Vice President", "Secretary", "Treasurer"] {
        assert_eq!(preset_permissions(title), MemberPermissions::ALL);
    }

    let active = preset_permissions("Active Member");
    assert!(active.can_manage_club_settings);
    assert!(!active.can_add_members);
    assert!(!active.can_publish_blogs);

    assert_eq!(preset_permissions("General Member"), MemberPermissions::NONE);
    // unrecognized labels grant nothing
    assert_eq!(preset_permissions("Grand Vizier"), MemberPermissions::NONE);
}
