use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

pub mod config;
pub mod storage;

pub mod blog;
pub mod club;
pub mod user;

/// The module for unit testing, will only be availabled in dev env.
#[cfg(test)]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("permission denied")]
    PermissionDenied,
    #[error("you can't remove yourself")]
    SelfRemoval,
    #[error("you can't delete yourself")]
    SelfDeletion,
    #[error("username or password incorrect")]
    UsernameOrPasswordIncorrect,
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,
    #[error("club not found")]
    ClubNotFound,
    #[error("member not found")]
    MemberNotFound,
    #[error("announcement not found")]
    AnnouncementNotFound,
    #[error("blog not found")]
    BlogNotFound,
    #[error("invalid member")]
    InvalidMember,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("non-ascii header value: {0}")]
    HeaderNonAscii(axum::http::header::ToStrError),
    #[error("auth headers are not in {{user id}} + {{token}} syntax")]
    InvalidAuthHeader,

    #[error("storage errored: {0}")]
    Storage(std::io::Error),
}

impl Error {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            // Authentication and authorization failures share 401
            // on purpose, the envelope message tells them apart.
            Error::NotLoggedIn
            | Error::PermissionDenied
            | Error::UsernameOrPasswordIncorrect => StatusCode::UNAUTHORIZED,
            Error::SelfRemoval | Error::SelfDeletion => StatusCode::BAD_REQUEST,
            Error::UserExists | Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UserNotFound
            | Error::ClubNotFound
            | Error::MemberNotFound
            | Error::AnnouncementNotFound
            | Error::BlogNotFound => StatusCode::NOT_FOUND,
            Error::InvalidMember | Error::HeaderNonAscii(_) | Error::InvalidAuthHeader => {
                StatusCode::BAD_REQUEST
            }
            Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for Error {
    #[inline]
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorInfo {
            status: &'static str,
            message: String,
        }
        (
            self.to_status_code(),
            axum::Json(ErrorInfo {
                status: "ERROR",
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Implements `From<T>` for [`Error`].
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(err)
                }
            }
        )*
    };
}

impl_from! {
    axum::http::header::ToStrError => HeaderNonAscii,
    std::io::Error => Storage,
}

/// Every persisted collection, constructed once at startup and passed
/// to each handler through the router state.
pub struct AppState {
    pub users: storage::Collection<user::User>,
    pub clubs: storage::Collection<club::Club>,
    pub blogs: storage::Collection<blog::Blog>,
}

impl AppState {
    /// Open all collections under the given data directory.
    pub fn open(data_dir: &std::path::Path) -> std::io::Result<Self> {
        Ok(Self {
            users: storage::Collection::open(data_dir)?,
            clubs: storage::Collection::open(data_dir)?,
            blogs: storage::Collection::open(data_dir)?,
        })
    }

    /// A state with no file persistence, used by the test suite.
    pub fn in_memory() -> Self {
        Self {
            users: storage::Collection::in_memory(),
            clubs: storage::Collection::in_memory(),
            blogs: storage::Collection::in_memory(),
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Construct the application router over the given state.
pub fn router(state: SharedState) -> axum::Router {
    axum::Router::new()
        // accounts
        .route("/api/signup", post(user::handle::signup))
        .route("/api/auth/login", post(user::handle::login))
        .route("/api/auth/logout", post(user::handle::logout))
        // users
        .route(
            "/api/users",
            get(user::handle::list_users).post(user::handle::make_user),
        )
        .route(
            "/api/users/info",
            get(user::handle::current_user).patch(user::handle::edit_profile),
        )
        .route("/api/users/info/clubs", get(user::handle::current_user_clubs))
        .route(
            "/api/users/:id",
            get(user::handle::view_user)
                .patch(user::handle::edit_user)
                .delete(user::handle::delete_user),
        )
        // clubs
        .route(
            "/api/clubs",
            get(club::handle::list_clubs).post(club::handle::create_club),
        )
        .route(
            "/api/clubs/:id",
            get(club::handle::view_club)
                .patch(club::handle::edit_club)
                .delete(club::handle::delete_club),
        )
        // members
        .route(
            "/api/clubs/:id/members",
            get(club::handle::list_members).post(club::handle::add_member),
        )
        .route(
            "/api/clubs/:id/members/:user_id",
            axum::routing::patch(club::handle::edit_member).delete(club::handle::remove_member),
        )
        // announcements
        .route(
            "/api/clubs/:id/announcements",
            get(club::handle::list_announcements).post(club::handle::create_announcement),
        )
        .route(
            "/api/clubs/:id/announcements/:announcement_id",
            get(club::handle::view_announcement)
                .patch(club::handle::edit_announcement)
                .delete(club::handle::delete_announcement),
        )
        // blogs
        .route(
            "/api/clubs/:id/blogs",
            get(blog::handle::list_club_blogs).post(blog::handle::create_blog),
        )
        .route(
            "/api/clubs/:id/blogs/:blog_id",
            get(blog::handle::view_blog)
                .patch(blog::handle::edit_blog)
                .delete(blog::handle::delete_blog),
        )
        .route("/api/blogs", get(blog::handle::list_public_blogs))
        .with_state(state)
}

/// The authenticated principal of a request, resolved from the
/// `Token` and `UserId` headers against the user's token list.
pub struct Auth {
    pub user_id: u64,
    pub role: user::UserRole,
    /// The presented token, kept around so logout can revoke it.
    pub token: String,
}

impl Auth {
    #[inline]
    pub fn is_superuser(&self) -> bool {
        self.role == user::UserRole::Superuser
    }

    /// This principal as a policy actor.
    #[inline]
    pub fn actor(&self) -> club::policy::Actor {
        club::policy::Actor {
            id: self.user_id,
            role: self.role,
        }
    }
}

#[axum::async_trait]
impl axum::extract::FromRequestParts<SharedState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Token")
            .ok_or(Error::NotLoggedIn)?
            .to_str()?
            .to_string();

        let user_id = parts
            .headers
            .get("UserId")
            .ok_or(Error::NotLoggedIn)?
            .to_str()?
            .parse()
            .map_err(|_| Error::InvalidAuthHeader)?;

        let role = state
            .users
            .with(user_id, |user| {
                user.tokens.token_usable(&token).then_some(user.role)
            })
            .flatten()
            .ok_or(Error::NotLoggedIn)?;

        Ok(Self {
            user_id,
            role,
            token,
        })
    }
}
