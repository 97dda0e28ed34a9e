use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sha256::digest;

use clubhub_shared::user::handle::*;

use super::{User, UserRole};
use crate::club::handle::ClubSummary;
use crate::{Auth, Error, SharedState};

/// Self-service signup, always producing a plain `user`.
pub async fn signup(
    State(state): State<SharedState>,
    Json(descriptor): Json<SignupDescriptor>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let user = User::new(
        descriptor.name,
        descriptor.email,
        &descriptor.password,
        UserRole::User,
        None,
    )?;

    let profile = user.profile();
    if !state.users.insert(user) {
        return Err(Error::UserExists);
    }

    tracing::info!("user {} registered", profile.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "OK",
            "message": "User registered successfully",
            "user": profile,
        })),
    ))
}

/// Exchange email and password for a fresh token.
pub async fn login(
    State(state): State<SharedState>,
    Json(descriptor): Json<LoginDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    let id = state
        .users
        .find(|user| user.email == descriptor.email)
        .ok_or(Error::UsernameOrPasswordIncorrect)?;

    let (token, profile) = state
        .users
        .update(id, |user| {
            let token = user.login(&descriptor.password)?;
            Ok::<_, Error>((token, user.profile()))
        })
        .ok_or(Error::UsernameOrPasswordIncorrect)??;

    Ok(Json(json!({
        "status": "OK",
        "token": token,
        "user": profile,
    })))
}

/// Revoke the token this request was authenticated with.
pub async fn logout(
    State(state): State<SharedState>,
    ctx: Auth,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .users
        .update(ctx.user_id, |user| user.logout(&ctx.token))
        .ok_or(Error::NotLoggedIn)??;

    Ok(Json(json!({ "status": "OK" })))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// List users, optionally filtered by a search string over name and email.
pub async fn list_users(
    State(state): State<SharedState>,
    _ctx: Auth,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, Error> {
    let users = state.users.select(|user| match &query.search {
        Some(search) => user.matches_search(search).then(|| user.profile()),
        None => Some(user.profile()),
    });

    Ok(Json(json!({ "status": "OK", "users": users })))
}

/// Administrative user creation.
pub async fn make_user(
    State(state): State<SharedState>,
    ctx: Auth,
    Json(descriptor): Json<MakeUserDescriptor>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    if !ctx.is_superuser() {
        return Err(Error::PermissionDenied);
    }

    let user = User::new(
        descriptor.name,
        descriptor.email,
        &descriptor.password,
        descriptor.role,
        descriptor.profile_pic,
    )?;

    let profile = user.profile();
    if !state.users.insert(user) {
        return Err(Error::UserExists);
    }

    tracing::info!("user {} created by {}", profile.id, ctx.user_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "OK",
            "message": "User registered successfully",
            "user": profile,
        })),
    ))
}

/// The current user's own profile.
pub async fn current_user(
    State(state): State<SharedState>,
    ctx: Auth,
) -> Result<Json<serde_json::Value>, Error> {
    let profile = state
        .users
        .with(ctx.user_id, |user| user.profile())
        .ok_or(Error::UserNotFound)?;

    Ok(Json(json!({ "status": "OK", "user": profile })))
}

/// Self-service profile edit.
pub async fn edit_profile(
    State(state): State<SharedState>,
    ctx: Auth,
    Json(descriptor): Json<EditUserDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .users
        .update(ctx.user_id, |user| {
            if let Some(name) = descriptor.name {
                if name.trim().is_empty() {
                    return Err(Error::Validation("name must not be empty"));
                }
                user.name = name;
            }
            if let Some(profile_pic) = descriptor.profile_pic {
                user.profile_pic = profile_pic;
            }
            if let Some(password) = descriptor.password {
                if password.is_empty() {
                    return Err(Error::Validation("password must not be empty"));
                }
                user.password_sha = digest(password);
            }
            Ok(())
        })
        .ok_or(Error::UserNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "User updated successfully!" }),
    ))
}

/// Clubs the current user holds a member entry in.
pub async fn current_user_clubs(
    State(state): State<SharedState>,
    ctx: Auth,
) -> Result<Json<serde_json::Value>, Error> {
    let clubs = state
        .clubs
        .select(|club| club.is_member(ctx.user_id).then(|| ClubSummary::from(club)));

    Ok(Json(json!({ "status": "OK", "clubs": clubs })))
}

/// View a user by id. Superuser only.
pub async fn view_user(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    if !ctx.is_superuser() {
        return Err(Error::PermissionDenied);
    }

    let profile = state
        .users
        .with(id, |user| user.profile())
        .ok_or(Error::UserNotFound)?;

    Ok(Json(json!({ "status": "OK", "user": profile })))
}

/// Edit a user by id. Superuser only; this is the only place a user
/// can be promoted to `superuser`.
pub async fn edit_user(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<ManageUserDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    if !ctx.is_superuser() {
        return Err(Error::PermissionDenied);
    }

    if let Some(email) = &descriptor.email {
        if !email.contains('@') {
            return Err(Error::Validation("email address is malformed"));
        }
        // The id stays stable across an email change, so uniqueness
        // has to be checked against every other record.
        if state
            .users
            .find(|user| &user.email == email && user.id != id)
            .is_some()
        {
            return Err(Error::UserExists);
        }
    }

    state
        .users
        .update(id, |user| {
            if let Some(name) = descriptor.name {
                if name.trim().is_empty() {
                    return Err(Error::Validation("name must not be empty"));
                }
                user.name = name;
            }
            if let Some(email) = descriptor.email {
                user.email = email;
            }
            if let Some(password) = descriptor.password {
                if password.is_empty() {
                    return Err(Error::Validation("password must not be empty"));
                }
                user.password_sha = digest(password);
            }
            if let Some(role) = descriptor.role {
                user.role = role;
            }
            if let Some(profile_pic) = descriptor.profile_pic {
                user.profile_pic = profile_pic;
            }
            Ok(())
        })
        .ok_or(Error::UserNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "User updated successfully!" }),
    ))
}

/// Delete a user by id. Superuser only, never oneself.
pub async fn delete_user(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, Error> {
    if !ctx.is_superuser() {
        return Err(Error::PermissionDenied);
    }
    if ctx.user_id == id {
        return Err(Error::SelfDeletion);
    }

    if !state.users.remove(id) {
        return Err(Error::UserNotFound);
    }

    tracing::info!("user {} deleted by {}", id, ctx.user_id);
    Ok(Json(
        json!({ "status": "OK", "message": "User deleted successfully!" }),
    ))
}
