use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::attempt::{normalize_identifier, Attempt};
use super::config::GateConfig;
use super::status::{format_reset_time, GateStatistics, GateStatus};
use crate::clock::{Clock, SystemClock};
use crate::events::{emit, AuthEvent};
use crate::store::KeyValueStore;
use crate::AuthError;

/// Sliding-window limiter for one named action.
///
/// Attempts are kept as a JSON list under the gate's storage key. Every check
/// recomputes the window from the current instant, so there are no bucket
/// boundaries to game: a burst straddling what would be a reset in a fixed
/// window still counts as a single burst.
///
/// Store failures never reach the caller. Unreadable data counts as no
/// attempts when checking, a failed read or write is reported as `false`
/// from [`record_attempt`](Self::record_attempt), and all of them are logged.
/// Every recording emits [`AuthEvent::AttemptRecorded`].
///
/// # Example
///
/// ```rust
/// use portcullis::{AttemptGate, GateConfig, InMemoryStore};
/// use std::sync::Arc;
///
/// let gate = AttemptGate::new("login", GateConfig::login(), Arc::new(InMemoryStore::new())).unwrap();
///
/// assert!(gate.check_limit(Some("a@x.com")).allowed);
/// gate.record_attempt(Some("a@x.com"));
/// assert_eq!(gate.check_limit(Some("a@x.com")).remaining_attempts, 4);
/// ```
pub struct AttemptGate {
    name: String,
    config: GateConfig,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl AttemptGate {
    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationError`] if the config is invalid.
    pub fn new(
        name: impl Into<String>,
        config: GateConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AuthError> {
        Self::with_clock(name, config, store, Arc::new(SystemClock))
    }

    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationError`] if the config is invalid.
    pub fn with_clock(
        name: impl Into<String>,
        config: GateConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            store,
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Decides whether another attempt is allowed. Does not record anything.
    pub fn check_limit(&self, identifier: Option<&str>) -> GateStatus {
        let now = self.clock.now();
        let identifier = normalize_identifier(identifier);

        let counted: Vec<Attempt> = self
            .load_in_window(now)
            .into_iter()
            .filter(|a| a.matches(identifier.as_deref()))
            .collect();

        let used = u32::try_from(counted.len()).unwrap_or(u32::MAX);
        let remaining = self.config.max_attempts.saturating_sub(used);

        if remaining > 0 {
            return GateStatus::allowed(remaining);
        }

        let reset_in = counted
            .iter()
            .map(|a| a.timestamp)
            .min()
            .map_or_else(Duration::zero, |oldest| {
                oldest
                    .checked_add_signed(self.config.window)
                    .map_or(self.config.window, |reopens| reopens - now)
                    .max(Duration::zero())
            });
        let reset_in_formatted = format_reset_time(reset_in);

        GateStatus {
            allowed: false,
            remaining_attempts: 0,
            reset_in,
            message: Some(self.config.render_message(&reset_in_formatted)),
            reset_in_formatted,
        }
    }

    /// Appends an attempt stamped with the current time.
    ///
    /// Returns `false` when the attempt could not be persisted. The caller
    /// must not block the user because of it; the attempt is simply not
    /// counted. If the stored list cannot be read, nothing is written, so
    /// attempts already in the window are never overwritten.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "record_attempt", skip_all, fields(gate = %self.name))
    )]
    pub fn record_attempt(&self, identifier: Option<&str>) -> bool {
        let now = self.clock.now();
        let identifier = normalize_identifier(identifier);

        let persisted = self.read_in_window(now).and_then(|mut attempts| {
            attempts.push(Attempt::new(now, identifier.clone()));
            self.persist(&attempts)
        });

        if let Err(ref e) = persisted {
            log::warn!(
                target: "portcullis",
                "msg=\"attempt not recorded\", gate=\"{}\", error=\"{e}\"",
                self.name
            );
        }

        emit(AuthEvent::AttemptRecorded {
            gate: self.name.clone(),
            identifier,
            persisted: persisted.is_ok(),
            at: now,
        });

        persisted.is_ok()
    }

    /// Drops every attempt for this gate. Administrative use only.
    pub fn clear_attempts(&self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            log::warn!(
                target: "portcullis",
                "msg=\"failed to clear attempts\", gate=\"{}\", error=\"{e}\"",
                self.name
            );
        }
    }

    /// Drops the attempts of one identifier, leaving the rest of the gate intact.
    ///
    /// Returns `false` if the store refused the write.
    pub fn clear_identifier(&self, identifier: &str) -> bool {
        let Some(identifier) = normalize_identifier(Some(identifier)) else {
            return true;
        };

        let now = self.clock.now();
        let cleared = self.read_in_window(now).and_then(|attempts| {
            let kept: Vec<Attempt> = attempts
                .into_iter()
                .filter(|a| a.identifier.as_deref() != Some(identifier.as_str()))
                .collect();
            self.persist(&kept)
        });

        match cleared {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    target: "portcullis",
                    "msg=\"failed to clear identifier\", gate=\"{}\", error=\"{e}\"",
                    self.name
                );
                false
            }
        }
    }

    pub fn statistics(&self) -> GateStatistics {
        let attempts = self.load_in_window(self.clock.now());

        let unique_identifiers = attempts
            .iter()
            .filter_map(|a| a.identifier.as_deref())
            .collect::<HashSet<_>>()
            .len();

        GateStatistics {
            total_attempts: attempts.len(),
            unique_identifiers,
            oldest_attempt: attempts.iter().map(|a| a.timestamp).min(),
            newest_attempt: attempts.iter().map(|a| a.timestamp).max(),
        }
    }

    /// Current time on the gate's clock.
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// In-window attempts for read-only use. A store that cannot be read
    /// counts as empty.
    fn load_in_window(&self, now: DateTime<Utc>) -> Vec<Attempt> {
        self.read_in_window(now).unwrap_or_else(|e| {
            log::warn!(
                target: "portcullis",
                "msg=\"attempt store unreadable\", gate=\"{}\", error=\"{e}\"",
                self.name
            );
            Vec::new()
        })
    }

    /// In-window attempts for a read-modify-write. Corrupt data reads as
    /// empty so the next write replaces it; a failed read is an error.
    fn read_in_window(&self, now: DateTime<Utc>) -> Result<Vec<Attempt>, AuthError> {
        let window_start = now
            .checked_sub_signed(self.config.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let Some(raw) = self.store.get(&self.config.storage_key)? else {
            return Ok(Vec::new());
        };

        let attempts: Vec<Attempt> = serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!(
                target: "portcullis",
                "msg=\"discarding corrupt attempt data\", gate=\"{}\", error=\"{e}\"",
                self.name
            );
            Vec::new()
        });

        Ok(attempts
            .into_iter()
            .filter(|a| a.is_after(window_start))
            .collect())
    }

    fn persist(&self, attempts: &[Attempt]) -> Result<(), AuthError> {
        let json = serde_json::to_string(attempts)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;
        self.store.set(&self.config.storage_key, &json)
    }
}

impl std::fmt::Debug for AttemptGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttemptGate")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
