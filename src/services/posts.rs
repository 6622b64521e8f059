use chrono::Utc;
use tracing::{debug, info, instrument};

use super::CommentService;
use crate::entities::post::{BODY_MAX, NewPost, STATUS_MAX, TITLE_MAX};
use crate::entities::{Post, next_id, truncate};
use crate::error::{ContentError, StoreError};
use crate::store::Store;

#[derive(Clone, Debug)]
pub struct PostService {
    store: Store<Post>,
    comments: CommentService,
}

impl PostService {
    /// `comments` is the service whose entries are removed with their post.
    pub fn new(store: Store<Post>, comments: CommentService) -> Self {
        Self { store, comments }
    }

    pub fn store(&self) -> &Store<Post> {
        &self.store
    }

    /// All posts in storage order.
    pub async fn list(&self) -> Vec<Post> {
        self.store.load().await
    }

    /// The `limit` most recently created posts, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.store.load().await;
        posts.reverse();
        posts.truncate(limit);
        posts
    }

    pub async fn get(&self, id: u64) -> Option<Post> {
        self.store.load().await.into_iter().find(|p| p.id == id)
    }

    /// Posts whose title or body contains `query`, ignoring case. A blank
    /// query matches everything.
    pub async fn search(&self, query: &str) -> Vec<Post> {
        let needle = query.trim().to_lowercase();
        let posts = self.store.load().await;
        if needle.is_empty() {
            return posts;
        }
        posts.into_iter().filter(|p| p.matches(&needle)).collect()
    }

    #[instrument(skip_all)]
    pub async fn create(&self, input: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.store.load().await;
        let post = Post {
            id: next_id(&posts),
            title: truncate(&input.title, TITLE_MAX),
            body: truncate(&input.body, BODY_MAX),
            date: Utc::now(),
            status: input
                .status
                .map(|s| truncate(s.trim(), STATUS_MAX))
                .filter(|s| !s.is_empty()),
            views: 0,
        };
        posts.push(post.clone());
        self.store.save(&posts).await?;
        info!(id = post.id, "post created");
        Ok(post)
    }

    /// Delete the post, then every comment that points at it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ContentError> {
        let mut posts = self.store.load().await;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(ContentError::NotFound { kind: "post", id });
        }
        self.store.save(&posts).await?;

        let removed = self.comments.delete_for_post(id).await?;
        info!(comments = removed, "post deleted");
        Ok(())
    }

    /// Bump the view counter and return the updated post.
    ///
    /// Load, increment, save: two concurrent reads of the same post may
    /// count once.
    #[instrument(skip(self))]
    pub async fn increment_view(&self, id: u64) -> Result<Option<Post>, StoreError> {
        let mut posts = self.store.load().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.views += 1;
        let updated = post.clone();
        self.store.save(&posts).await?;
        debug!(views = updated.views, "post viewed");
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::entities::comment::NewComment;

    fn services(dir: &TempDir) -> (PostService, CommentService) {
        let comments = CommentService::new(Store::new(dir.path(), "comments", Vec::new()));
        let posts = PostService::new(Store::new(dir.path(), "posts", Vec::new()), comments.clone());
        (posts, comments)
    }

    fn new_post(title: &str, body: &str) -> NewPost {
        NewPost {
            title: title.into(),
            body: body.into(),
            status: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);

        let created = posts
            .create(NewPost {
                title: "First".into(),
                body: "Body".into(),
                status: Some("  published ".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.views, 0);
        assert_eq!(created.status.as_deref(), Some("published"));

        assert_eq!(posts.get(1).await, Some(created));
        assert_eq!(posts.get(2).await, None);
    }

    #[tokio::test]
    async fn blank_status_is_none() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        let created = posts
            .create(NewPost {
                status: Some("   ".into()),
                ..new_post("t", "b")
            })
            .await
            .unwrap();
        assert_eq!(created.status, None);
    }

    #[tokio::test]
    async fn long_title_is_truncated() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);

        let title: String = ('a'..='z').cycle().take(300).collect();
        let created = posts.create(new_post(&title, "b")).await.unwrap();
        assert_eq!(created.title.chars().count(), 200);
        assert_eq!(created.title, &title[..200]);

        let body = "x".repeat(BODY_MAX + 5);
        let created = posts.create(new_post("t", &body)).await.unwrap();
        assert_eq!(created.body.len(), BODY_MAX);
    }

    #[tokio::test]
    async fn ids_follow_max_not_history() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        for title in ["a", "b", "c"] {
            posts.create(new_post(title, "")).await.unwrap();
        }
        posts.delete(2).await.unwrap();
        assert_eq!(posts.create(new_post("d", "")).await.unwrap().id, 4);

        posts.delete(4).await.unwrap();
        assert_eq!(posts.create(new_post("e", "")).await.unwrap().id, 4);

        for id in [1, 3, 4] {
            posts.delete(id).await.unwrap();
        }
        assert!(posts.list().await.is_empty());
        assert_eq!(posts.create(new_post("f", "")).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn delete_cascades_to_own_comments_only() {
        let dir = TempDir::new().unwrap();
        let (posts, comments) = services(&dir);
        let keep = posts.create(new_post("keep", "")).await.unwrap();
        let gone = posts.create(new_post("gone", "")).await.unwrap();

        for (post_id, text) in [(keep.id, "k1"), (gone.id, "g1"), (gone.id, "g2"), (keep.id, "k2")] {
            comments
                .create(NewComment {
                    post_id,
                    name: "n".into(),
                    comment: text.into(),
                })
                .await
                .unwrap();
        }

        posts.delete(gone.id).await.unwrap();

        assert_eq!(posts.get(gone.id).await, None);
        let left: Vec<String> = comments.list().await.into_iter().map(|c| c.comment).collect();
        assert_eq!(left, vec!["k1", "k2"]);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        assert!(posts.delete(9).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn views_count_every_read() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        let post = posts.create(new_post("t", "b")).await.unwrap();

        for n in 1..=5 {
            let viewed = posts.increment_view(post.id).await.unwrap().unwrap();
            assert_eq!(viewed.views, n);
        }
        assert_eq!(posts.get(post.id).await.unwrap().views, 5);
        assert_eq!(posts.increment_view(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        posts.create(new_post("Alpha Launch", "rockets")).await.unwrap();
        posts.create(new_post("Beta Notes", "misc")).await.unwrap();

        for query in ["launch", "LAUNCH", " Launch "] {
            let hits = posts.search(query).await;
            assert_eq!(hits.len(), 1, "query {query:?}");
            assert_eq!(hits[0].title, "Alpha Launch");
        }
        assert_eq!(posts.search("misc").await[0].title, "Beta Notes");
        assert_eq!(posts.search("").await.len(), 2);
        assert!(posts.search("gamma").await.is_empty());
    }

    #[tokio::test]
    async fn recent_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        for title in ["one", "two", "three"] {
            posts.create(new_post(title, "")).await.unwrap();
        }
        let titles: Vec<String> = posts.recent(2).await.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["three", "two"]);
    }

    // Whole-file read-modify-write: racing creates may lose one another.
    // Only the bounds are asserted.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_creates_may_lose_updates() {
        let dir = TempDir::new().unwrap();
        let (posts, _) = services(&dir);
        let (a, b) = tokio::join!(posts.create(new_post("a", "")), posts.create(new_post("b", "")));
        a.unwrap();
        b.unwrap();
        let count = posts.list().await.len();
        assert!((1..=2).contains(&count));
    }
}
