use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use clubhub_shared::blog::handle::*;
use clubhub_shared::user::UserProfile;

use super::{Blog, BlogStatus};
use crate::club::policy::{self, Action};
use crate::{Auth, Error, SharedState};

/// A blog with its author and club references expanded.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub featured_image: String,
    pub status: BlogStatus,
    pub author: BlogAuthorView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug)]
pub struct BlogAuthorView {
    pub user: Option<UserProfile>,
    pub club: Option<BlogClubRef>,
}

/// The slice of a club a blog listing exposes.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BlogClubRef {
    pub id: u64,
    pub name: String,
    pub profile_pic: String,
}

fn blog_view(state: &SharedState, blog: &Blog) -> BlogView {
    BlogView {
        id: blog.id,
        title: blog.title.clone(),
        content: blog.content.clone(),
        featured_image: blog.featured_image.clone(),
        status: blog.status,
        author: BlogAuthorView {
            user: state.users.with(blog.author.user, |user| user.profile()),
            club: state.clubs.with(blog.author.club, |club| BlogClubRef {
                id: club.id,
                name: club.name.clone(),
                profile_pic: club.profile_pic.clone(),
            }),
        },
        created_at: blog.created_at,
        updated_at: blog.updated_at,
    }
}

/// List public blogs across every club. No authentication.
pub async fn list_public_blogs(
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, Error> {
    let blogs = state
        .blogs
        .select(|blog| blog.status.is_public().then(|| blog_view(&state, blog)));

    Ok(Json(json!({ "status": "OK", "blogs": blogs })))
}

#[derive(Deserialize)]
pub struct ListQuery {
    /// Include drafts and internal blogs; member-gated.
    pub all: Option<bool>,
}

/// List a club's blogs. Public blogs need no login; `?all=true` also
/// returns drafts and internal blogs to club members and superusers.
pub async fn list_club_blogs(
    State(state): State<SharedState>,
    ctx: Option<Auth>,
    Path(id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, Error> {
    let all = query.all.unwrap_or(false);

    if !state.clubs.contains(id) {
        return Err(Error::ClubNotFound);
    }

    if all {
        let ctx = ctx.ok_or(Error::NotLoggedIn)?;
        state
            .clubs
            .with(id, |club| {
                policy::authorize(ctx.actor(), club, Action::ViewInternal)
            })
            .ok_or(Error::ClubNotFound)??;
    }

    let blogs = state.blogs.select(|blog| {
        (blog.author.club == id && (all || blog.status.is_public()))
            .then(|| blog_view(&state, blog))
    });

    Ok(Json(json!({ "status": "OK", "blogs": blogs })))
}

/// Write a blog for a club. Any member (or a superuser) may create;
/// the author is recorded server-side.
pub async fn create_blog(
    State(state): State<SharedState>,
    ctx: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<NewBlogDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .with(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ViewInternal)
        })
        .ok_or(Error::ClubNotFound)??;

    if descriptor.title.trim().is_empty() {
        return Err(Error::Validation("blog title must not be empty"));
    }
    if descriptor.content.is_empty() {
        return Err(Error::Validation("blog content must not be empty"));
    }
    if descriptor.featured_image.is_empty() {
        return Err(Error::Validation("blog featured image must not be empty"));
    }

    let blog = Blog::new(descriptor, ctx.user_id, id);
    let blog_id = blog.id;
    state.blogs.insert(blog);

    tracing::info!("blog {} created by {} in club {}", blog_id, ctx.user_id, id);
    Ok(Json(json!({
        "status": "OK",
        "message": "Blog created successfully",
        "blog": blog_id,
    })))
}

/// Look up a blog's author, ensuring the blog belongs to the club.
fn club_blog_author(state: &SharedState, club_id: u64, blog_id: u64) -> Result<u64, Error> {
    state
        .blogs
        .with(blog_id, |blog| {
            if blog.author.club == club_id {
                Ok(blog.author.user)
            } else {
                Err(Error::BlogNotFound)
            }
        })
        .ok_or(Error::BlogNotFound)?
}

/// View a single blog of a club. Requires membership or superuser.
pub async fn view_blog(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, blog_id)): Path<(u64, u64)>,
) -> Result<Json<serde_json::Value>, Error> {
    state
        .clubs
        .with(id, |club| {
            policy::authorize(ctx.actor(), club, Action::ViewInternal)
        })
        .ok_or(Error::ClubNotFound)??;

    let blog = state
        .blogs
        .with(blog_id, |blog| {
            (blog.author.club == id).then(|| blog_view(&state, blog))
        })
        .flatten()
        .ok_or(Error::BlogNotFound)?;

    Ok(Json(json!({ "status": "OK", "blog": blog })))
}

/// Whether the requester may mutate the given blog: its author, a
/// member holding `canPublishBlogs`, or a superuser.
fn authorize_blog_mutation(
    state: &SharedState,
    ctx: &Auth,
    club_id: u64,
    author: u64,
) -> Result<(), Error> {
    if author == ctx.user_id {
        return Ok(());
    }

    state
        .clubs
        .with(club_id, |club| {
            policy::authorize(ctx.actor(), club, Action::PublishBlogs)
        })
        .ok_or(Error::ClubNotFound)?
}

/// Edit a blog. Authorship, `canPublishBlogs` or superuser.
pub async fn edit_blog(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, blog_id)): Path<(u64, u64)>,
    Json(descriptor): Json<EditBlogDescriptor>,
) -> Result<Json<serde_json::Value>, Error> {
    let author = club_blog_author(&state, id, blog_id)?;
    authorize_blog_mutation(&state, &ctx, id, author)?;

    state
        .blogs
        .update(blog_id, |blog| {
            if let Some(title) = descriptor.title {
                if title.trim().is_empty() {
                    return Err(Error::Validation("blog title must not be empty"));
                }
                blog.title = title;
            }
            if let Some(content) = descriptor.content {
                blog.content = content;
            }
            if let Some(featured_image) = descriptor.featured_image {
                blog.featured_image = featured_image;
            }
            if let Some(status) = descriptor.status {
                blog.status = status;
            }
            blog.updated_at = Utc::now();
            Ok(())
        })
        .ok_or(Error::BlogNotFound)??;

    Ok(Json(
        json!({ "status": "OK", "message": "Blog updated successfully!" }),
    ))
}

/// Delete a blog. Authorship, `canPublishBlogs` or superuser.
pub async fn delete_blog(
    State(state): State<SharedState>,
    ctx: Auth,
    Path((id, blog_id)): Path<(u64, u64)>,
) -> Result<Json<serde_json::Value>, Error> {
    let author = club_blog_author(&state, id, blog_id)?;
    authorize_blog_mutation(&state, &ctx, id, author)?;

    state.blogs.remove(blog_id);

    tracing::info!("blog {} deleted by {}", blog_id, ctx.user_id);
    Ok(Json(
        json!({ "status": "OK", "message": "Blog deleted successfully!" }),
    ))
}
