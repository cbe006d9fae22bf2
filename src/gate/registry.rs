use std::collections::HashMap;
use std::sync::Arc;

use super::attempt_gate::AttemptGate;
use super::config::GateConfig;
use super::status::GateStatus;
use crate::clock::{Clock, SystemClock};
use crate::config::PortcullisConfig;
use crate::store::{KeyValueStore, ScopedStore};
use crate::AuthError;

pub const LOGIN: &str = "login";
pub const REGISTRATION: &str = "registration";
pub const PASSWORD_RESET: &str = "password-reset";
pub const EMAIL_VERIFICATION: &str = "email-verification";

/// Named gates sharing one store and one clock.
///
/// Build it once at start-up; configs are fixed after registration.
///
/// ```rust
/// use portcullis::{GateConfig, GateRegistry, InMemoryStore};
/// use std::sync::Arc;
///
/// let registry = GateRegistry::new(Arc::new(InMemoryStore::new()))
///     .with_gate("login", GateConfig::login())?
///     .with_gate("export", GateConfig::per_hour(10).storage_key("myapp:export"))?;
///
/// assert!(registry.check("login", Some("a@x.com"))?.allowed);
/// # Ok::<(), portcullis::AuthError>(())
/// ```
#[derive(Clone)]
pub struct GateRegistry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    gates: HashMap<String, Arc<AttemptGate>>,
}

impl GateRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            gates: HashMap::new(),
        }
    }

    /// Registry holding the four standard gates with their default configs.
    pub fn standard(store: Arc<dyn KeyValueStore>) -> Result<Self, AuthError> {
        Self::from_config(store, &PortcullisConfig::default())
    }

    /// Registers the four standard gates from `config`.
    ///
    /// When `config.namespace` is set, every storage key is prefixed with it.
    pub fn from_config(
        store: Arc<dyn KeyValueStore>,
        config: &PortcullisConfig,
    ) -> Result<Self, AuthError> {
        Self::from_config_with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(
        store: Arc<dyn KeyValueStore>,
        config: &PortcullisConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let store: Arc<dyn KeyValueStore> = match &config.namespace {
            Some(scope) => Arc::new(ScopedStore::new(store, scope.clone())),
            None => store,
        };

        Self::with_clock(store, clock)
            .with_gate(LOGIN, config.gates.login.clone())?
            .with_gate(REGISTRATION, config.gates.registration.clone())?
            .with_gate(PASSWORD_RESET, config.gates.password_reset.clone())?
            .with_gate(EMAIL_VERIFICATION, config.gates.email_verification.clone())
    }

    /// Registers a named gate.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, or if its storage key is already used
    /// by another gate (two gates must never share counters).
    pub fn with_gate(mut self, name: impl Into<String>, config: GateConfig) -> Result<Self, AuthError> {
        let name = name.into();

        if let Some(other) = self
            .gates
            .values()
            .find(|g| g.name() != name && g.config().get_storage_key() == config.get_storage_key())
        {
            return Err(AuthError::ConfigurationError(format!(
                "storage key '{}' is already used by gate '{}'",
                config.get_storage_key(),
                other.name()
            )));
        }

        let gate = AttemptGate::with_clock(
            name.clone(),
            config,
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
        )?;
        self.gates.insert(name, Arc::new(gate));
        Ok(self)
    }

    pub fn gate(&self, name: &str) -> Option<Arc<AttemptGate>> {
        self.gates.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gates.keys().map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::GateNotConfigured`] for an unknown gate name.
    pub fn check(&self, name: &str, identifier: Option<&str>) -> Result<GateStatus, AuthError> {
        Ok(self.require(name)?.check_limit(identifier))
    }

    /// Records an attempt. The inner `bool` is `false` if the store refused it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::GateNotConfigured`] for an unknown gate name.
    pub fn record(&self, name: &str, identifier: Option<&str>) -> Result<bool, AuthError> {
        Ok(self.require(name)?.record_attempt(identifier))
    }

    fn require(&self, name: &str) -> Result<&Arc<AttemptGate>, AuthError> {
        self.gates
            .get(name)
            .ok_or_else(|| AuthError::GateNotConfigured(name.to_owned()))
    }
}

impl std::fmt::Debug for GateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateRegistry")
            .field("gates", &self.gates.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_standard_registry_has_four_gates() {
        let registry = GateRegistry::standard(Arc::new(InMemoryStore::new())).unwrap();

        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![EMAIL_VERIFICATION, LOGIN, PASSWORD_RESET, REGISTRATION]
        );
    }

    #[test]
    fn test_gates_do_not_share_counters() {
        let registry = GateRegistry::standard(Arc::new(InMemoryStore::new())).unwrap();

        for _ in 0..3 {
            registry.record(REGISTRATION, Some("a@x.com")).unwrap();
        }

        assert!(!registry.check(REGISTRATION, Some("a@x.com")).unwrap().allowed);

        let login = registry.check(LOGIN, Some("a@x.com")).unwrap();
        assert!(login.allowed);
        assert_eq!(login.remaining_attempts, 5);
    }

    #[test]
    fn test_unknown_gate() {
        let registry = GateRegistry::new(Arc::new(InMemoryStore::new()));

        assert_eq!(
            registry.check("missing", None).unwrap_err(),
            AuthError::GateNotConfigured("missing".to_owned())
        );
        assert!(registry.record("missing", None).is_err());
        assert!(registry.gate("missing").is_none());
    }

    #[test]
    fn test_duplicate_storage_key_rejected() {
        let result = GateRegistry::new(Arc::new(InMemoryStore::new()))
            .with_gate("a", GateConfig::per_minute(1).storage_key("same"))
            .and_then(|r| r.with_gate("b", GateConfig::per_minute(1).storage_key("same")));

        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }

    #[test]
    fn test_namespace_prefixes_storage_keys() {
        let store = Arc::new(InMemoryStore::new());
        let config = PortcullisConfig {
            namespace: Some("profile-1".to_owned()),
            ..PortcullisConfig::default()
        };

        let registry = GateRegistry::from_config(store.clone(), &config).unwrap();
        registry.record(LOGIN, Some("a@x.com")).unwrap();

        assert!(store.get("profile-1:portcullis:login").unwrap().is_some());
        assert!(store.get("portcullis:login").unwrap().is_none());
    }
}
