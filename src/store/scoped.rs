use std::sync::Arc;

use super::KeyValueStore;
use crate::AuthError;

/// Namespaces every key of an inner store with a fixed prefix.
///
/// Lets several applications (or several profiles of one application) share
/// a single backing store without reading each other's counters.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: impl Into<String>) -> Self {
        let mut prefix = scope.into();
        if !prefix.ends_with(':') {
            prefix.push(':');
        }
        Self { inner, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        self.inner.get(&self.scoped(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.inner.set(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.inner.remove(&self.scoped(key))
    }
}

impl std::fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_keys_are_prefixed() {
        let inner = Arc::new(InMemoryStore::new());
        let scoped = ScopedStore::new(inner.clone(), "profile-a");

        scoped.set("login", "x").unwrap();

        assert_eq!(scoped.prefix(), "profile-a:");
        assert_eq!(inner.get("profile-a:login").unwrap().as_deref(), Some("x"));
        assert!(inner.get("login").unwrap().is_none());
    }

    #[test]
    fn test_scopes_do_not_collide() {
        let inner: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let a = ScopedStore::new(Arc::clone(&inner), "a");
        let b = ScopedStore::new(Arc::clone(&inner), "b:");

        a.set("login", "from-a").unwrap();
        b.set("login", "from-b").unwrap();

        assert_eq!(a.get("login").unwrap().as_deref(), Some("from-a"));
        assert_eq!(b.get("login").unwrap().as_deref(), Some("from-b"));

        a.remove("login").unwrap();
        assert!(a.get("login").unwrap().is_none());
        assert_eq!(b.get("login").unwrap().as_deref(), Some("from-b"));
    }
}
