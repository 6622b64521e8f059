use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

pub const NAME_MAX: usize = 50;
pub const COMMENT_MAX: usize = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Parent post. Not checked on write, so a comment can outlive its post.
    #[serde(rename = "postId")]
    pub post_id: u64,
    pub name: String,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl Entity for Comment {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewComment {
    pub post_id: u64,
    pub name: String,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_is_camel_case_on_disk() {
        let comment = Comment {
            id: 2,
            post_id: 9,
            name: "ann".into(),
            comment: "nice".into(),
            date: Utc::now(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["postId"], 9);
        assert!(json.get("post_id").is_none());
    }
}
