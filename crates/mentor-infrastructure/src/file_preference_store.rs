//! File-backed preference store.
//!
//! Each namespace is one TOML table at `<dir>/<namespace>.toml`. Reads and
//! writes hit an in-memory view that is updated synchronously; every change
//! enqueues a snapshot of its whole namespace to a single background writer,
//! which applies them in submission order through [`AtomicTomlFile`].

use crate::storage::AtomicTomlFile;
use mentor_core::error::{MentorError, Result};
use mentor_core::preference::PreferenceStore;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

type Namespace = BTreeMap<String, String>;

enum WriterCommand {
    Flush { namespace: String, snapshot: Namespace },
    Barrier(oneshot::Sender<()>),
}

/// Preference store persisted under a directory of TOML files.
///
/// Must be opened inside a tokio runtime; the writer task lives as long as
/// the store.
pub struct FilePreferenceStore {
    dir: PathBuf,
    namespaces: Mutex<HashMap<String, Namespace>>,
    writer: mpsc::UnboundedSender<WriterCommand>,
}

impl FilePreferenceStore {
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;

        let (writer, commands) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(dir.clone(), commands));

        tracing::info!("[PreferenceStore] Opened {}", dir.display());
        Ok(Self {
            dir,
            namespaces: Mutex::new(HashMap::new()),
            writer,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Waits until every change made so far has reached the disk.
    pub async fn flush(&self) -> Result<()> {
        let (done, wait) = oneshot::channel();
        self.writer
            .send(WriterCommand::Barrier(done))
            .map_err(|_| MentorError::internal("preference writer has stopped"))?;
        wait.await
            .map_err(|_| MentorError::internal("preference writer has stopped"))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Namespace>> {
        self.namespaces.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` to the cached namespace and enqueues its snapshot.
    ///
    /// The enqueue happens under the cache lock so the writer sees snapshots
    /// in the same order the changes were made.
    fn mutate<F>(&self, namespace: &str, change: F)
    where
        F: FnOnce(&mut Namespace),
    {
        let mut namespaces = self.lock();
        let entries = namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| read_namespace(&self.dir, namespace));
        change(entries);

        let command = WriterCommand::Flush {
            namespace: namespace.to_string(),
            snapshot: entries.clone(),
        };
        if self.writer.send(command).is_err() {
            tracing::error!(
                "[PreferenceStore] Writer stopped, change to '{}' is memory-only",
                namespace
            );
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        let mut namespaces = self.lock();
        namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| read_namespace(&self.dir, namespace))
            .get(key)
            .cloned()
    }

    fn put(&self, namespace: &str, key: &str, value: String) {
        self.mutate(namespace, |entries| {
            entries.insert(key.to_string(), value);
        });
    }

    fn remove(&self, namespace: &str, key: &str) {
        self.mutate(namespace, |entries| {
            entries.remove(key);
        });
    }
}

fn namespace_file(dir: &Path, namespace: &str) -> AtomicTomlFile<Namespace> {
    AtomicTomlFile::new(dir.join(format!("{}.toml", namespace)))
}

/// Unreadable files start the namespace empty; the next write replaces them.
fn read_namespace(dir: &Path, namespace: &str) -> Namespace {
    match namespace_file(dir, namespace).load() {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                "[PreferenceStore] Ignoring unreadable namespace '{}': {}",
                namespace,
                e
            );
            Namespace::new()
        }
    }
}

async fn run_writer(dir: PathBuf, mut commands: mpsc::UnboundedReceiver<WriterCommand>) {
    while let Some(command) = commands.recv().await {
        match command {
            WriterCommand::Flush {
                namespace,
                snapshot,
            } => {
                let file = namespace_file(&dir, &namespace);
                let result = tokio::task::spawn_blocking(move || file.save(&snapshot)).await;
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::error!(
                        "[PreferenceStore] Failed to write namespace '{}': {}",
                        namespace,
                        e
                    ),
                    Err(e) => tracing::error!(
                        "[PreferenceStore] Write task for '{}' panicked: {}",
                        namespace,
                        e
                    ),
                }
            }
            WriterCommand::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("[PreferenceStore] Writer finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_is_visible_before_flush() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();

        store.put("user_prefs", "username", "alice".to_string());
        assert_eq!(store.get("user_prefs", "username").as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();
            store.put("ChatPrefs", "messages", r#"[{"text":"hi","isUserMessage":true}]"#.to_string());
            store.put("user_prefs", "username", "alice".to_string());
            store.flush().await.unwrap();
        }

        let reopened = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(
            reopened.get("ChatPrefs", "messages").as_deref(),
            Some(r#"[{"text":"hi","isUserMessage":true}]"#)
        );
        assert_eq!(reopened.get("user_prefs", "username").as_deref(), Some("alice"));
        assert!(temp_dir.path().join("ChatPrefs.toml").exists());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();

        for i in 0..50 {
            store.put("TutorChatPrefs", "messages", format!("value-{}", i));
        }
        store.flush().await.unwrap();

        let on_disk = namespace_file(temp_dir.path(), "TutorChatPrefs")
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(on_disk["messages"], "value-49");
    }

    #[tokio::test]
    async fn test_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();

        store.put("user_prefs", "username", "alice".to_string());
        store.remove("user_prefs", "username");
        store.flush().await.unwrap();

        let reopened = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert!(reopened.get("user_prefs", "username").is_none());
    }

    #[tokio::test]
    async fn test_unreadable_namespace_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("ChatPrefs.toml"), "messages = [oops").unwrap();

        let store = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert!(store.get("ChatPrefs", "messages").is_none());

        store.put("ChatPrefs", "messages", "[]".to_string());
        store.flush().await.unwrap();
        let reopened = FilePreferenceStore::open(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("ChatPrefs", "messages").as_deref(), Some("[]"));
    }
}
