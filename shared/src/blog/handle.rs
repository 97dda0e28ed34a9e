use serde::{Deserialize, Serialize};

use super::BlogStatus;

/// Descriptor of a blog creation.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogDescriptor {
    pub title: String,
    pub content: String,
    pub featured_image: String,
    #[serde(default)]
    pub status: BlogStatus,
}

/// Descriptor of a blog edit.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EditBlogDescriptor {
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<BlogStatus>,
}
