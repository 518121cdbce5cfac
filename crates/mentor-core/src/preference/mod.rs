//! Preference store abstraction.
//!
//! A flat string key-value store grouped into namespaces, modelled after a
//! mobile platform's shared preferences: reads are synchronous, writes are
//! fire-and-forget. Implementations must never let two writes to the same key
//! interleave partially; the last complete write wins.

mod memory;

pub use memory::{InMemoryPreferenceStore, PreferenceWrite};

/// Namespace for account-level preferences.
pub const USER_PREFS_NAMESPACE: &str = "user_prefs";

/// Key of the remembered username inside [`USER_PREFS_NAMESPACE`].
pub const USERNAME_KEY: &str = "username";

/// Shared key-value preference store.
///
/// There is exactly one store per application context; components receive it
/// as `Arc<dyn PreferenceStore>`.
pub trait PreferenceStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, namespace: &str, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// The new value is visible to `get` as soon as this returns; durable
    /// persistence may complete later. Failures are logged, not returned.
    fn put(&self, namespace: &str, key: &str, value: String);

    /// Removes `key` from the namespace.
    fn remove(&self, namespace: &str, key: &str);
}
