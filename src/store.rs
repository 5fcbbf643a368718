//! Document persistence keyed by a fixed session identifier.
//!
//! Loading never fails the session: a missing or malformed document falls back
//! to the built-in default, and corrupt data is not partially recovered.

use crate::error::Result;
use crate::model::Document;
use crate::render::json::to_json;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Session identifier the current document is stored under.
pub const SESSION_KEY: &str = "api-doc-current";

pub trait DocumentStore {
    /// Raw load: `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Document>>;
    fn save(&self, doc: &Document) -> Result<()>;
}

/// Load the session document, falling back to [`Document::default`].
pub fn load_or_default(store: &dyn DocumentStore) -> Document {
    match store.load() {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            debug!("no saved document, using default");
            Document::default()
        }
        Err(e) => {
            warn!(error = %e, "failed to load saved document, using default");
            Document::default()
        }
    }
}

/// Stores the session document as `<dir>/api-doc-current.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", SESSION_KEY))
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<Document>> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, doc: &Document) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        // Write then rename so a crash never leaves a half-written session.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, to_json(doc)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
        assert_eq!(load_or_default(&store), Document::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        let doc = edit::set_title(&Document::default(), "Saved");
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap(), Some(doc.clone()));
        assert_eq!(load_or_default(&store), doc);
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "{ \"title\": \"half").unwrap();
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), Document::default());
    }

    #[test]
    fn wrong_shape_is_not_partially_merged() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), r#"{ "title": "Only a title" }"#).unwrap();
        assert_eq!(load_or_default(&store).title, "Aether Chat Protocol");
    }
}
