use poem::error::ResponseError;
use poem::http::StatusCode;

/// Errors from persisting a collection. Reads never produce one.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {collection}: {source}")]
    Io {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error on {collection}: {source}")]
    Serialization {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ResponseError for StoreError {
    fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl ResponseError for ContentError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ContentError::NotFound { kind: "post", id: 4 };
        assert!(err.is_not_found());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "post 4 not found");
    }

    #[test]
    fn store_failure_maps_to_500() {
        let err = ContentError::from(StoreError::Io {
            collection: "posts",
            source: std::io::Error::other("disk full"),
        });
        assert!(!err.is_not_found());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("posts"));
    }
}
