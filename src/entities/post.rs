use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

pub const TITLE_MAX: usize = 200;
pub const BODY_MAX: usize = 10_000;
pub const STATUS_MAX: usize = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    /// Creation time; never changes.
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub views: u64,
}

impl Entity for Post {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Fields accepted when creating a post.
#[derive(Clone, Debug, Default)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub status: Option<String>,
}

impl Post {
    /// Case-insensitive substring match over title and body.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.body.to_lowercase().contains(needle_lower)
    }

    /// First post written on a fresh data directory.
    pub fn welcome() -> Self {
        Self {
            id: 1,
            title: "Hello, world".into(),
            body: "This blog is up and running. Sign in at /admin to write the first real post.".into(),
            date: Utc::now(),
            status: None,
            views: 0,
        }
    }
}
