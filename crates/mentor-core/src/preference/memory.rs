//! In-memory preference store.

use super::PreferenceStore;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// One recorded mutation of an [`InMemoryPreferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceWrite {
    Put {
        namespace: String,
        key: String,
        value: String,
    },
    Remove {
        namespace: String,
        key: String,
    },
}

/// Process-local preference store that also keeps an ordered write journal.
///
/// Used when nothing should touch the disk (offline runs, tests). The journal
/// lets callers check how many writes a component performed and in which
/// order.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: Mutex<HashMap<(String, String), String>>,
    journal: Mutex<Vec<PreferenceWrite>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every write performed so far, oldest first.
    pub fn writes(&self) -> Vec<PreferenceWrite> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the writes that touched `(namespace, key)`.
    pub fn writes_for(&self, namespace: &str, key: &str) -> Vec<PreferenceWrite> {
        self.writes()
            .into_iter()
            .filter(|w| match w {
                PreferenceWrite::Put {
                    namespace: ns,
                    key: k,
                    ..
                }
                | PreferenceWrite::Remove {
                    namespace: ns,
                    key: k,
                } => ns == namespace && k == key,
            })
            .collect()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, namespace: &str, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&self, namespace: &str, key: &str, value: String) {
        // Both locks are held so the journal order matches the value order.
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut journal = self.journal.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert((namespace.to_string(), key.to_string()), value.clone());
        journal.push(PreferenceWrite::Put {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
        });
    }

    fn remove(&self, namespace: &str, key: &str) {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut journal = self.journal.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(&(namespace.to_string(), key.to_string()));
        journal.push(PreferenceWrite::Remove {
            namespace: namespace.to_string(),
            key: key.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let store = InMemoryPreferenceStore::new();
        assert!(store.get("user_prefs", "username").is_none());

        store.put("user_prefs", "username", "alice".to_string());
        assert_eq!(store.get("user_prefs", "username").as_deref(), Some("alice"));

        store.remove("user_prefs", "username");
        assert!(store.get("user_prefs", "username").is_none());
        assert_eq!(store.writes().len(), 2);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = InMemoryPreferenceStore::new();
        store.put("ChatPrefs", "messages", "[1]".to_string());
        store.put("TutorChatPrefs", "messages", "[2]".to_string());

        assert_eq!(store.get("ChatPrefs", "messages").as_deref(), Some("[1]"));
        assert_eq!(store.writes_for("TutorChatPrefs", "messages").len(), 1);
    }
}
