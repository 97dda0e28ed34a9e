mod blog;
mod policy;
mod storage;

use std::sync::Arc;

use axum::http;
use chrono::Utc;
use hyper::{Body, Request};
use serde_json::Value;

use crate::club::{Club, Member, MemberPermissions};
use crate::user::{User, UserRole};
use crate::{AppState, SharedState};

fn state() -> SharedState {
    Arc::new(AppState::in_memory())
}

/// Seed a user and return its id together with a usable token.
fn seed_user(state: &SharedState, name: &str, email: &str, role: UserRole) -> (u64, String) {
    let mut user = User::new(
        name.to_string(),
        email.to_string(),
        "password123456",
        role,
        None,
    )
    .unwrap();

    let token = user.tokens.new_token(user.id, 1);
    let id = user.id;
    assert!(state.users.insert(user));

    (id, token)
}

/// Seed a club with the given member entries.
fn seed_club(state: &SharedState, name: &str, members: Vec<Member>) -> u64 {
    let now = Utc::now();
    let club = Club {
        id: crate::storage::random_id(),
        name: name.to_string(),
        description: "A club for testing".to_string(),
        profile_pic: "clubs/test".to_string(),
        banner: None,
        is_available_for_registration: true,
        members,
        announcements: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let id = club.id;
    assert!(state.clubs.insert(club));
    id
}

fn member(user: u64, permissions: MemberPermissions) -> Member {
    Member {
        user,
        role: "General Member".to_string(),
        rank: 5,
        showcase: true,
        permissions,
    }
}

/// Build a request, optionally authenticated and carrying a JSON body.
fn request(method: &str, uri: &str, auth: Option<(u64, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);

    if let Some((id, token)) = auth {
        builder = builder.header("Token", token).header("UserId", id);
    }

    match body {
        Some(value) => builder
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&hyper::body::to_bytes(response.into_body()).await.unwrap()).unwrap()
}
