use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::StoreError;

/// Whole-file persistence for one named JSON collection.
///
/// Every `load` reads the entire file and every `save` replaces it. There is
/// no locking: two read-modify-write cycles on the same collection race and
/// the last `save` wins.
#[derive(Clone, Debug)]
pub struct Store<T> {
    name: &'static str,
    path: PathBuf,
    seed: Vec<T>,
}

impl<T> Store<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// A store for `<dir>/<name>.json`, falling back to `seed` when the file
    /// is absent or unusable.
    pub fn new(dir: &Path, name: &'static str, seed: Vec<T>) -> Self {
        Self {
            name,
            path: dir.join(format!("{name}.json")),
            seed,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. Read failures are never surfaced.
    pub async fn load(&self) -> Vec<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(collection = self.name, "collection file absent, using seed");
                return self.seed.clone();
            }
            Err(e) => {
                warn!(collection = self.name, error = %e, "collection unreadable, using seed");
                return self.seed.clone();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                warn!(collection = self.name, error = %e, "collection corrupt, using seed");
                self.seed.clone()
            }
        }
    }

    /// Replace the whole collection on disk.
    ///
    /// The document goes to a sibling temp file first and is renamed over the
    /// target, so a concurrent `load` sees either the old or the new file.
    pub async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(items).map_err(|source| StoreError::Serialization {
            collection: self.name,
            source,
        })?;

        let tmp = self.temp_path();
        if let Err(source) = tokio::fs::write(&tmp, &json).await {
            return Err(StoreError::Io { collection: self.name, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io { collection: self.name, source });
        }

        debug!(collection = self.name, count = items.len(), "collection saved");
        Ok(())
    }

    /// Write the seed if the file does not exist yet. Never overwrites.
    /// Returns whether the file was created.
    pub async fn ensure_initialized(&self) -> Result<bool, StoreError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Io { collection: self.name, source })?;
        }

        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => Ok(false),
            Ok(false) => {
                self.save(&self.seed).await?;
                info!(collection = self.name, path = %self.path.display(), "collection initialized");
                Ok(true)
            }
            Err(source) => Err(StoreError::Io { collection: self.name, source }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut suffix = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut suffix);
        self.path
            .with_file_name(format!("{}.json.{}.tmp", self.name, hex::encode(suffix)))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use tempfile::TempDir;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u64,
        text: String,
    }

    fn note(id: u64, text: &str) -> Note {
        Note { id, text: text.into() }
    }

    #[tokio::test]
    async fn absent_file_loads_seed() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path(), "notes", vec![note(1, "hello")]);
        assert_eq!(store.load().await, vec![note(1, "hello")]);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store: Store<Note> = Store::new(dir.path(), "notes", Vec::new());
        store.save(&[note(1, "a"), note(2, "b")]).await.unwrap();
        assert_eq!(store.load().await, vec![note(1, "a"), note(2, "b")]);

        store.save(&[note(3, "c")]).await.unwrap();
        assert_eq!(store.load().await, vec![note(3, "c")]);
    }

    #[tokio::test]
    async fn corrupt_file_loads_seed() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path(), "notes", vec![note(9, "seed")]);
        std::fs::write(store.path(), b"{ not json").unwrap();
        assert_eq!(store.load().await, vec![note(9, "seed")]);
    }

    #[tokio::test]
    async fn ensure_initialized_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(&dir.path().join("nested"), "notes", vec![note(1, "seed")]);

        assert!(store.ensure_initialized().await.unwrap());
        assert_eq!(store.load().await, vec![note(1, "seed")]);

        store.save(&[note(5, "edited")]).await.unwrap();
        assert!(!store.ensure_initialized().await.unwrap());
        assert_eq!(store.load().await, vec![note(5, "edited")]);
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store: Store<Note> = Store::new(dir.path(), "notes", Vec::new());
        store.save(&[note(1, "a")]).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["notes.json".to_string()]);
    }

    #[tokio::test]
    async fn save_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let store: Store<Note> = Store::new(&dir.path().join("gone"), "notes", Vec::new());
        let err = store.save(&[note(1, "a")]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { collection: "notes", .. }));
    }
}
