pub mod handle;

use serde::{Deserialize, Serialize};

/// Visibility status of a blog.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    /// Listed on public endpoints.
    Public,
    /// Visible to club members only.
    Draft,
    /// Finished but restricted to club members.
    Internal,
}

impl Default for BlogStatus {
    #[inline]
    fn default() -> Self {
        BlogStatus::Draft
    }
}

impl BlogStatus {
    /// Whether blogs with this status appear on public listings.
    #[inline]
    pub fn is_public(self) -> bool {
        matches!(self, BlogStatus::Public)
    }
}

/// Author of a blog: the writing user and the club it was written for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlogAuthor {
    pub user: u64,
    pub club: u64,
}
