use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use clubhub_shared::club::handle::*;
use clubhub_shared::user::UserProfile;

use super::policy::{self, Action};
use super::{Announcement, AnnouncementAuthor, Club, Member, MemberPermissions};
use crate::{Auth, Error, SharedState};

/// A club as returned by listing endpoints: announcements omitted,
/// member entries kept as raw user ids.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClubSummary {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub profile_pic: String,
    pub banner: Option<String>,
    pub is_available_for_registration: bool,
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Club> for ClubSummary {
    fn from(club: &Club) -> Self {
        Self {
            id: club.id,
            name: club.name.clone(),
            description: club.description.clone(),
            profile_pic: club.profile_pic.clone(),
            banner: club.banner.clone(),
            is_available_for_registration: club.is_available_for_registration,
            members: club.members.clone(),
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }
}

/// A member entry with its user record expanded, password digest
/// stripped. `user` is `None` when the referenced user vanished.
#[derive(Serialize, Debug)]
pub struct MemberView {
    pub user: Option<UserProfile>,
    pub role: String,
    pub rank: u32,
    pub showcase: bool,
    pub permissions: MemberPermissions,
}

fn member_view(state: &SharedState, member: &Member) -> MemberView {
    MemberView {
        user: state.users.with(member.user, |user| user.profile()),
        role: member.role.clone(),
        rank: member.rank,
        showcase: member.showcase,
        permissions: member.permissions,
    }
}

/// An announcement with its author expanded.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub photo: Option<String>,
    pub author: AnnouncementAuthorView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct AnnouncementAuthorView {
    pub user: Option<UserProfile>,
    pub role: String,
}

fn announcement_view(state: &SharedState, entry: &Announcement) -> AnnouncementView {
    AnnouncementView {
        id: entry.id,
        title: entry.title.clone(),
        description: entry.description.clone(),
        photo: entry.photo.clone(),
        author: AnnouncementAuthorView {
            user: state.users.with(entry.author.user, |user| user.profile()),
            role: entry.author.role.clone(),
        },
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    }
}

/// List every club. Public.
pub async fn list_clubs(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, Error> {
    let clubs = state.clubs.select(|club| Some(ClubSummary::from(club)));

    Ok(Json(json!({ "status": "OK", "clubs": clubs })))
}

/// Create a club. Superuser only.
pub async fn create_club(
    State(state): State<SharedState>,
    ctx: Auth,
    Json(descriptor): Json<NewClubDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    if !ctx.is_superuser() {
        return Err(Error::PermissionDenied);
    }

    if descriptor.name.trim().is_empty() {
        return Err(Error::Validation("club name must not be empty"));
    }
    if descriptor.description.trim().is_empty() {
        return Err(Error::Validation("club description must not be empty"));
    }
    if descriptor.profile_pic.is_empty() {
        return Err(Error::Validation("club profile picture must not be empty"));
    }

    let club = Club::new(descriptor);
    let summary = ClubSummary::from(&club);
    state.clubs.insert(club);

    tracing::info!("club {} created by {}", summary.id, ctx.user_id);
    Ok(Json(json!({ "status": "OK", "club": summary })))
}

/// View a club with member users expanded. Public; announcements are
/// omitted, they have their own member-gated endpoint.
pub async fn view_club(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    let club = state
        .clubs
        .with(id, |club| {
            json!({
                "id": club.id,
                "name": club.name,
                "description": club.description,
                "profilePic": club.profile_pic,
                "banner": club.banner,
                "isAvailableForRegistration": club.is_available_for_registration,
                "members": club
                    .members
                    .iter()
                    .map(|member| member_view(&state, member))
                    .collect::<Vec<_>>(),
                "createdAt": club.created_at,
                "updatedAt": club.updated_at,
            })
        })
        .ok_or(Error::ClubNotFound)?;

    Ok(Json(json!({ "status": "OK", "club": club })))
}

/// Edit club settings. Requires `canManageClubSettings` or superuser.
pub async fn edit_club(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<EditClubDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ManageSettings)?;

            if let Some(name) = descriptor.name {
                if name.trim().is_empty() {
                    return Err(Error::Validation("club name must not be empty"));
                }
                club.name = name;
            }
            if let Some(description) = descriptor.description {
                club.description = description;
            }
            if let Some(profile_pic) = descriptor.profile_pic {
                club.profile_pic = profile_pic;
            }
            if let Some(banner) = descriptor.banner {
                club.banner = Some(banner);
            }
            if let Some(open) = descriptor.is_available_for_registration {
                club.is_available_for_registration = open;
            }
            club.updated_at = Utc::now();
            Ok(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "Club updated successfully!" }),
    ))
}

/// Delete a club. Superuser only, never satisfiable club-level.
pub async fn delete_club(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .with(id, |club| policy::authorize(ctx.actor(), club, Action::Delete))
        .ok_or(Error::ClubNotFound)??;

    state.clubs.remove(id);

    tracing::info!("club {} deleted by {}", id, ctx.user_id);
    Ok(Json(
        json!({ "status": "OK", "message": "Club deleted successfully!" }),
    ))
}

/// List member entries with users expanded. Public.
pub async fn list_members(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    let members = state
        .clubs
        .with(id, |club| {
            club.members
                .iter()
                .map(|member| member_view(&state, member))
                .collect::<Vec<_>>()
        })
        .ok_or(Error::ClubNotFound)?;

    Ok(Json(json!({ "status": "OK", "members": members })))
}

/// Add a member. Requires `canAddMembers` or superuser.
///
/// Adding a user who already holds an entry is an idempotent OK; the
/// duplicate check and the push share the club's write lock, so two
/// racing adds produce exactly one entry.
pub async fn add_member(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<NewMemberDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    if descriptor.role.trim().is_empty() {
        return Err(Error::Validation("member role must not be empty"));
    }
    if !state.users.contains(descriptor.user) {
        return Err(Error::InvalidMember);
    }

    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::AddMembers)?;

            let permissions = descriptor
                .permissions
                .unwrap_or_else(|| super::preset_permissions(&descriptor.role));

            club.push_member(Member {
                user: descriptor.user,
                role: descriptor.role.clone(),
                rank: descriptor.rank,
                showcase: descriptor.showcase,
                permissions,
            });
            club.updated_at = Utc::now();
            Ok::<_, Error>(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "Member added successfully!" }),
    ))
}

/// Remove a member. Requires `canRemoveMembers` or superuser; removing
/// oneself is always refused.
pub async fn remove_member(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, user_id)): Path<(u64, u64)>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::RemoveMember { target: user_id })?;

            club.remove_member(user_id);
            club.updated_at = Utc::now();
            Ok::<_, Error>(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "Member deleted successfully!" }),
    ))
}

/// Edit a member entry. Requires `canManagePermissions` or superuser.
pub async fn edit_member(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, user_id)): Path<(u64, u64)>,
    Json(descriptor): Json<EditMemberDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ManagePermissions)?;

            let member = club.member_mut(user_id).ok_or(Error::MemberNotFound)?;
            if let Some(role) = descriptor.role {
                if role.trim().is_empty() {
                    return Err(Error::Validation("member role must not be empty"));
                }
                member.role = role;
            }
            if let Some(rank) = descriptor.rank {
                member.rank = rank;
            }
            if let Some(showcase) = descriptor.showcase {
                member.showcase = showcase;
            }
            if let Some(permissions) = descriptor.permissions {
                member.permissions = permissions;
            }
            club.updated_at = Utc::now();
            Ok(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "Member updated successfully!" }),
    ))
}

/// List announcements newest first. Requires membership or superuser.
pub async fn list_announcements(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    let mut announcements = state
        .clubs
        .with(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ViewInternal)?;

            Ok::<_, Error>(
                club.announcements
                    .iter()
                    .map(|entry| announcement_view(&state, entry))
                    .collect::<Vec<_>>(),
            )
        })
        .ok_or(Error::ClubNotFound)??;

    announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(json!({ "status": "OK", "announcements": announcements })))
}

/// Publish an announcement. Requires `canPublishAnnouncements` or
/// superuser. The author is recorded server-side from the requester.
pub async fn create_announcement(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<NewAnnouncementDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    if descriptor.title.trim().is_empty() {
        return Err(Error::Validation("announcement title must not be empty"));
    }
    if descriptor.description.trim().is_empty() {
        return Err(Error::Validation(
            "announcement description must not be empty",
        ));
    }

    let announcement_id = state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::PublishAnnouncements)?;

            let now = Utc::now();
            let entry = Announcement {
                id: crate::storage::random_id(),
                title: descriptor.title.clone(),
                description: descriptor.description.clone(),
                photo: descriptor.photo.clone(),
                author: AnnouncementAuthor {
                    user: ctx.user_id,
                    // the member's label at the time of posting
                    role: club
                        .member(ctx.user_id)
                        .map(|member| member.role.clone())
                        .unwrap_or_else(|| "Superuser".to_string()),
                },
                created_at: now,
                updated_at: now,
            };

            let entry_id = entry.id;
            club.announcements.push(entry);
            club.updated_at = now;
            Ok::<_, Error>(entry_id)
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(json!({
        "status": "OK",
        "message": "Announcement created successfully!",
        "announcement": announcement_id,
    })))
}

/// View a single announcement. Requires membership or superuser.
pub async fn view_announcement(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, announcement_id)): Path<(u64, u64)>,
) -> Result<Json<serde_json::Value>, Error> {
    let announcement = state
        .clubs
        .with(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ViewInternal)?;

            club.announcement(announcement_id)
                .map(|entry| announcement_view(&state, entry))
                .ok_or(Error::AnnouncementNotFound)
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(json!({ "status": "OK", "announcement": announcement })))
}

/// Edit an announcement. Requires `canPublishAnnouncements` or superuser.
pub async fn edit_announcement(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, announcement_id)): Path<(u64, u64)>,
    Json(descriptor): Json<EditAnnouncementDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::PublishAnnouncements)?;

            let entry = club
                .announcement_mut(announcement_id)
                .ok_or(Error::AnnouncementNotFound)?;
            if let Some(title) = descriptor.title {
                if title.trim().is_empty() {
                    return Err(Error::Validation("announcement title must not be empty"));
                }
                entry.title = title;
            }
            if let Some(description) = descriptor.description {
                entry.description = description;
            }
            if let Some(photo) = descriptor.photo {
                entry.photo = Some(photo);
            }
            entry.updated_at = Utc::now();
            Ok(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(json!({
        "status": "OK",
        "message": "Announcement updated successfully!",
    })))
}

/// Delete an announcement. Requires `canPublishAnnouncements` or superuser.
pub async fn delete_announcement(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, announcement_id)): Path<(u64, u64)>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .update(id, |club| {
            policy::authorize(ctx.actor(), club, Action::PublishAnnouncements)?;

            if !club.remove_announcement(announcement_id) {
                return Err(Error::AnnouncementNotFound);
            }
            club.updated_at = Utc::now();
            Ok(())
        })
        .ok_or(Error::ClubNotFound)??;

    Ok(Json(json!({
        "status": "OK",
        "message": "Announcement deleted successfully!",
    })))
}
