pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub use models::Document;

/// File name of the document inside the data directory.
pub const DB_FILE: &str = "db.json";

/// The whole datastore: one JSON document held in memory and rewritten to
/// disk after every successful mutation.
pub struct Store {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl Store {
    /// Load (or create) `db.json` under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;
        let path = data_dir.join(DB_FILE);

        let doc = migrations::load(&path)?;
        persist(&path, &doc)?;

        info!(
            "Store opened at {} ({} users, {} listings, {} matches)",
            path.display(),
            doc.users.len(),
            doc.listings.len(),
            doc.matches.len()
        );
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only closure against the document.
    pub fn with_doc<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> T,
    {
        let doc = self.doc.lock().map_err(|e| anyhow::anyhow!("Store lock poisoned: {}", e))?;
        Ok(f(&doc))
    }

    /// Run a mutating closure. The document is written to disk only when the
    /// closure succeeds; on error the in-memory copy is rolled back.
    pub fn with_doc_mut<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Document) -> std::result::Result<T, E>,
        E: From<anyhow::Error>,
    {
        let mut doc = self
            .doc
            .lock()
            .map_err(|e| anyhow::anyhow!("Store lock poisoned: {}", e))?;

        let snapshot = doc.clone();
        match f(&mut doc) {
            Ok(value) => {
                if let Err(e) = persist(&self.path, &doc) {
                    *doc = snapshot;
                    return Err(e.into());
                }
                Ok(value)
            }
            Err(e) => {
                *doc = snapshot;
                Err(e)
            }
        }
    }
}

/// Overwrite the document file. Writes to a sibling temp file and renames it
/// into place so readers never see a half-written document.
fn persist(path: &Path, doc: &Document) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(doc)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    debug!("Persisted {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use collab_types::models::User;
    use uuid::Uuid;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.with_doc(|d| d.users.len()).unwrap(), 0);
    }

    #[test]
    fn test_mutation_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            store
                .with_doc_mut(|d| {
                    d.users.push(user("a@example.com"));
                    Ok::<_, anyhow::Error>(())
                })
                .unwrap();
        }
        let store = Store::open(dir.path()).unwrap();
        let email = store.with_doc(|d| d.users[0].email.clone()).unwrap();
        assert_eq!(email, "a@example.com");
    }

    #[test]
    fn test_failed_mutation_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let res: Result<()> = store.with_doc_mut(|d| {
            d.users.push(user("b@example.com"));
            anyhow::bail!("validation failed")
        });
        assert!(res.is_err());
        assert_eq!(store.with_doc(|d| d.users.len()).unwrap(), 0);

        let reopened = Store::open(dir.path()).unwrap();
        assert_eq!(reopened.with_doc(|d| d.users.len()).unwrap(), 0);
    }
}
