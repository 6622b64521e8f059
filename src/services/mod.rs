//! CRUD over the three content collections.

pub mod comments;
pub mod posts;
pub mod projects;

pub use comments::CommentService;
pub use posts::PostService;
pub use projects::ProjectService;

use std::path::Path;

use crate::entities::Post;
use crate::error::StoreError;
use crate::store::Store;

/// All content services over one data directory.
#[derive(Clone, Debug)]
pub struct Content {
    pub posts: PostService,
    pub comments: CommentService,
    pub projects: ProjectService,
}

impl Content {
    pub fn open(data_dir: &Path) -> Self {
        let comments = CommentService::new(Store::new(data_dir, "comments", Vec::new()));
        Self {
            posts: PostService::new(
                Store::new(data_dir, "posts", vec![Post::welcome()]),
                comments.clone(),
            ),
            comments,
            projects: ProjectService::new(Store::new(data_dir, "projects", Vec::new())),
        }
    }

    /// Create any missing collection file from its seed.
    pub async fn ensure_initialized(&self) -> Result<(), StoreError> {
        self.posts.store().ensure_initialized().await?;
        self.comments.store().ensure_initialized().await?;
        self.projects.store().ensure_initialized().await?;
        Ok(())
    }
}
