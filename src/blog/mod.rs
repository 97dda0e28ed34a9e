pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use clubhub_shared::blog::*;

use clubhub_shared::blog::handle::NewBlogDescriptor;

use crate::storage::Document;

/// A blog written by a club member.
#[derive(Serialize, Deserialize, Debug)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    /// Rich HTML body.
    pub content: String,
    pub featured_image: String,
    pub status: BlogStatus,
    pub author: BlogAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Blog {
    const NAME: &'static str = "blogs";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Blog {
    /// Create a blog authored by `user` for `club`.
    pub fn new(descriptor: NewBlogDescriptor, user: u64, club: u64) -> Self {
        let now = Utc::now();
        Self {
            id: crate::storage::random_id(),
            title: descriptor.title,
            content: descriptor.content,
            featured_image: descriptor.featured_image,
            status: descriptor.status,
            author: BlogAuthor { user, club },
            created_at: now,
            updated_at: now,
        }
    }
}
