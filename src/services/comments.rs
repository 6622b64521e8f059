use chrono::Utc;
use tracing::{info, instrument};

use crate::entities::comment::{COMMENT_MAX, NAME_MAX, NewComment};
use crate::entities::{Comment, next_id, truncate};
use crate::error::{ContentError, StoreError};
use crate::store::Store;

#[derive(Clone, Debug)]
pub struct CommentService {
    store: Store<Comment>,
}

impl CommentService {
    pub fn new(store: Store<Comment>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<Comment> {
        &self.store
    }

    pub async fn list(&self) -> Vec<Comment> {
        self.store.load().await
    }

    pub async fn get(&self, id: u64) -> Option<Comment> {
        self.store.load().await.into_iter().find(|c| c.id == id)
    }

    /// Comments on one post, oldest first.
    pub async fn for_post(&self, post_id: u64) -> Vec<Comment> {
        self.store
            .load()
            .await
            .into_iter()
            .filter(|c| c.post_id == post_id)
            .collect()
    }

    /// The referenced post is not checked.
    #[instrument(skip(self, input), fields(post_id = input.post_id))]
    pub async fn create(&self, input: NewComment) -> Result<Comment, StoreError> {
        let mut comments = self.store.load().await;
        let comment = Comment {
            id: next_id(&comments),
            post_id: input.post_id,
            name: truncate(&input.name, NAME_MAX),
            comment: truncate(&input.comment, COMMENT_MAX),
            date: Utc::now(),
        };
        comments.push(comment.clone());
        self.store.save(&comments).await?;
        info!(id = comment.id, "comment created");
        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ContentError> {
        let mut comments = self.store.load().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            return Err(ContentError::NotFound { kind: "comment", id });
        }
        self.store.save(&comments).await?;
        info!("comment deleted");
        Ok(())
    }

    /// Remove every comment on `post_id`. Returns how many were removed.
    #[instrument(skip(self))]
    pub async fn delete_for_post(&self, post_id: u64) -> Result<usize, StoreError> {
        let mut comments = self.store.load().await;
        let before = comments.len();
        comments.retain(|c| c.post_id != post_id);
        let removed = before - comments.len();
        if removed > 0 {
            self.store.save(&comments).await?;
            info!(removed, "comments removed with post");
        }
        Ok(removed)
    }
}
