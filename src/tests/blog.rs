use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::blog::{Blog, BlogAuthor, BlogStatus};
use crate::club::MemberPermissions;
use crate::user::UserRole;

use super::*;

fn seed_blog(state: &SharedState, club: u64, author: u64, title: &str, status: BlogStatus) -> u64 {
    let now = Utc::now();
    let blog = Blog {
        id: crate::storage::random_id(),
        title: title.to_string(),
        content: "<p>seeded</p>".to_string(),
        featured_image: "blogs/seeded".to_string(),
        status,
        author: BlogAuthor { user: author, club },
        created_at: now,
        updated_at: now,
    };

    let id = blog.id;
    assert!(state.blogs.insert(blog));
    id
}

#[tokio::test]
async fn public_listing_filters_by_status() {
    let state = state();
    let (author, _) = seed_user(&state, "Author", "author@example.com", UserRole::User);
    let club = seed_club(&state, "Writers", vec![member(author, MemberPermissions::NONE)]);

    seed_blog(&state, club, author, "published", BlogStatus::Public);
    seed_blog(&state, club, author, "draft", BlogStatus::Draft);
    seed_blog(&state, club, author, "internal", BlogStatus::Internal);

    let response = crate::router(state.clone())
        .oneshot(request("GET", "/api/blogs", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let blogs = body["blogs"].as_array().unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0]["title"], "published");
    assert_eq!(blogs[0]["author"]["user"]["name"], "Author");
    assert_eq!(blogs[0]["author"]["club"]["name"], "Writers");
}

#[tokio::test]
async fn club_listing_gates_drafts_behind_membership() {
    let state = state();
    let (insider, insider_token) = seed_user(&state, "Insider", "in@example.com", UserRole::User);
    let (outsider, outsider_token) =
        seed_user(&state, "Outsider", "out@example.com", UserRole::User);

    let club = seed_club(
        &state,
        "Writers",
        vec![member(insider, MemberPermissions::NONE)],
    );
    seed_blog(&state, club, insider, "published", BlogStatus::Public);
    seed_blog(&state, club, insider, "draft", BlogStatus::Draft);

    // the public slice needs no login
    let response = crate::router(state.clone())
        .oneshot(request("GET", &format!("/api/clubs/{club}/blogs"), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["blogs"].as_array().unwrap().len(), 1);

    // ?all=true requires a login at all
    let response = crate::router(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/clubs/{club}/blogs?all=true"),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // and a member entry past that
    let response = crate::router(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/clubs/{club}/blogs?all=true"),
            Some((outsider, &outsider_token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = crate::router(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/clubs/{club}/blogs?all=true"),
            Some((insider, &insider_token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["blogs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_blog_needs_membership_only() {
    let state = state();
    let (insider, insider_token) = seed_user(&state, "Insider", "in@example.com", UserRole::User);
    let (outsider, outsider_token) =
        seed_user(&state, "Outsider", "out@example.com", UserRole::User);

    let club = seed_club(
        &state,
        "Writers",
        vec![member(insider, MemberPermissions::NONE)],
    );

    let descriptor = json!({
        "title": "My first post",
        "content": "<p>hello</p>",
        "featuredImage": "blogs/first",
    });

    let response = crate::router(state.clone())
        .oneshot(request(
            "POST",
            &format!("/api/clubs/{club}/blogs"),
            Some((outsider, &outsider_token)),
            Some(descriptor.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = crate::router(state.clone())
        .oneshot(request(
            "POST",
            &format!("/api/clubs/{club}/blogs"),
            Some((insider, &insider_token)),
            Some(descriptor),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let id = body["blog"].as_u64().unwrap();

    // status omitted, defaulted to draft; author recorded server-side
    state
        .blogs
        .with(id, |blog| {
            assert_eq!(blog.status, BlogStatus::Draft);
            assert_eq!(blog.author.user, insider);
            assert_eq!(blog.author.club, club);
        })
        .unwrap();
}

#[tokio::test]
async fn mutation_allowed_for_author_flag_holder_and_superuser() {
    let state = state();
    let (author, author_token) = seed_user(&state, "Author", "author@example.com", UserRole::User);
    let (editor, editor_token) = seed_user(&state, "Editor", "editor@example.com", UserRole::User);
    let (plain, plain_token) = seed_user(&state, "Plain", "plain@example.com", UserRole::User);
    let (admin, admin_token) = seed_user(&state, "Admin", "admin@example.com", UserRole::Superuser);

    let editor_permissions = MemberPermissions {
        can_publish_blogs: true,
        ..MemberPermissions::NONE
    };
    let club = seed_club(
        &state,
        "Writers",
        vec![
            member(author, MemberPermissions::NONE),
            member(editor, editor_permissions),
            member(plain, MemberPermissions::NONE),
        ],
    );

    let blog = seed_blog(&state, club, author, "draft", BlogStatus::Draft);

    // a fellow member without the flag may not touch it
    let response = crate::router(state.clone())
        .oneshot(request(
            "PATCH",
            &format!("/api/clubs/{club}/blogs/{blog}"),
            Some((plain, &plain_token)),
            Some(json!({ "status": "public" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // the author edits their own post without any flag
    let response = crate::router(state.clone())
        .oneshot(request(
            "PATCH",
            &format!("/api/clubs/{club}/blogs/{blog}"),
            Some((author, &author_token)),
            Some(json!({ "status": "public", "title": "published" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.blogs.with(blog, |blog| blog.status.is_public()).unwrap());

    // now visible in the public listing
    let response = crate::router(state.clone())
        .oneshot(request("GET", "/api/blogs", None, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["blogs"].as_array().unwrap().len(), 1);

    // a flag holder deletes someone else's post
    let response = crate::router(state.clone())
        .oneshot(request(
            "DELETE",
            &format!("/api/clubs/{club}/blogs/{blog}"),
            Some((editor, &editor_token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.blogs.contains(blog));

    // and so does a superuser
    let other = seed_blog(&state, club, author, "another", BlogStatus::Draft);
    let response = crate::router(state.clone())
        .oneshot(request(
            "DELETE",
            &format!("/api/clubs/{club}/blogs/{other}"),
            Some((admin, &admin_token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!state.blogs.contains(other));
}

#[tokio::test]
async fn view_blog_checks_club_match() {
    let state = state();
    let (insider, token) = seed_user(&state, "Insider", "in@example.com", UserRole::User);
    let club = seed_club(
        &state,
        "Writers",
        vec![member(insider, MemberPermissions::NONE)],
    );
    let other_club = seed_club(
        &state,
        "Painters",
        vec![member(insider, MemberPermissions::NONE)],
    );
    let blog = seed_blog(&state, club, insider, "post", BlogStatus::Draft);

    let response = crate::router(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/clubs/{club}/blogs/{blog}"),
            Some((insider, &token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["blog"]["title"], "post");

    // the same blog under another club's path does not exist
    let response = crate::router(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/clubs/{other_club}/blogs/{blog}"),
            Some((insider, &token)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
