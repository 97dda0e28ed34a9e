pub mod handle;
pub mod policy;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use clubhub_shared::club::*;

use clubhub_shared::club::handle::NewClubDescriptor;

use crate::storage::Document;

/// A club with its embedded member and announcement entries.
#[derive(Serialize, Deserialize, Debug)]
pub struct Club {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub profile_pic: String,
    pub banner: Option<String>,
    pub is_available_for_registration: bool,
    pub members: Vec<Member>,
    pub announcements: Vec<Announcement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Club {
    const NAME: &'static str = "clubs";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Club {
    /// Create a club from its creation descriptor.
    pub fn new(descriptor: NewClubDescriptor) -> Self {
        let now = Utc::now();
        Self {
            id: crate::storage::random_id(),
            name: descriptor.name,
            description: descriptor.description,
            profile_pic: descriptor.profile_pic,
            banner: descriptor.banner,
            is_available_for_registration: descriptor.is_available_for_registration,
            members: Vec::new(),
            announcements: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The member entry of the given user, if any.
    pub fn member(&self, user: u64) -> Option<&Member> {
        self.members.iter().find(|member| member.user == user)
    }

    pub fn member_mut(&mut self, user: u64) -> Option<&mut Member> {
        self.members.iter_mut().find(|member| member.user == user)
    }

    #[inline]
    pub fn is_member(&self, user: u64) -> bool {
        self.member(user).is_some()
    }

    /// Add a member entry unless the user already holds one.
    ///
    /// Call sites mutate through the collection, so the check and the
    /// push run under one record write lock and a (club, user) pair
    /// can never end up with two entries.
    pub fn push_member(&mut self, member: Member) -> bool {
        if self.is_member(member.user) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Remove the member entry of the given user.
    pub fn remove_member(&mut self, user: u64) -> bool {
        let len = self.members.len();
        self.members.retain(|member| member.user != user);
        len > self.members.len()
    }

    pub fn announcement(&self, id: u64) -> Option<&Announcement> {
        self.announcements.iter().find(|entry| entry.id == id)
    }

    pub fn announcement_mut(&mut self, id: u64) -> Option<&mut Announcement> {
        self.announcements.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove_announcement(&mut self, id: u64) -> bool {
        let len = self.announcements.len();
        self.announcements.retain(|entry| entry.id != id);
        len > self.announcements.len()
    }
}
