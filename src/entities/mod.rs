pub mod comment;
pub mod post;
pub mod project;

pub use comment::Comment;
pub use post::Post;
pub use project::{Project, ProjectFields, ProjectStatus};

/// Anything stored in a collection keyed by a numeric id.
pub trait Entity {
    fn id(&self) -> u64;
}

/// `max(existing ids) + 1`, or 1 for an empty collection.
pub fn next_id<T: Entity>(items: &[T]) -> u64 {
    items.iter().map(Entity::id).max().map_or(1, |max| max + 1)
}

/// Keep at most `max` characters of `input`.
pub fn truncate(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((end, _)) => input[..end].to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(u64);

    impl Entity for Row {
        fn id(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn next_id_empty_is_one() {
        assert_eq!(next_id::<Row>(&[]), 1);
    }

    #[test]
    fn next_id_follows_max() {
        assert_eq!(next_id(&[Row(3), Row(7)]), 8);
        assert_eq!(next_id(&[Row(7), Row(3)]), 8);
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo wörld", 7), "héllo w");
        assert_eq!(truncate("日本語テキスト", 3), "日本語");
        assert_eq!(truncate("", 0), "");
        assert_eq!(truncate("abc", 0), "");
    }
}
