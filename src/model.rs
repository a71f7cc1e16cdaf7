use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i64,
    #[serde(default)]
    pub likes: BTreeSet<u64>,
}

impl Film {
    pub fn add_like(&mut self, user_id: u64) {
        self.likes.insert(user_id);
    }

    pub fn remove_like(&mut self, user_id: u64) {
        self.likes.remove(&user_id);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub email: String,
    pub login: String,
    #[serde(default)]
    pub name: String,
    pub birthday: NaiveDate,
    #[serde(default)]
    pub friends: BTreeSet<u64>,
}

impl User {
    pub fn add_friend(&mut self, friend_id: u64) {
        self.friends.insert(friend_id);
    }

    pub fn remove_friend(&mut self, friend_id: u64) {
        self.friends.remove(&friend_id);
    }

    /// A user without a display name is shown under their login.
    pub fn fill_name(&mut self) {
        if self.name.trim().is_empty() {
            self.name = self.login.clone();
        }
    }
}
