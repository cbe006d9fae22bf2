//! Client-side attempt throttling and login orchestration.
//!
//! Two pieces:
//!
//! - [`gate::AttemptGate`]: a sliding-window limiter over attempts kept in an
//!   injected [`store::KeyValueStore`]. Named gates (login, registration,
//!   password reset, email verification) are grouped in a [`gate::GateRegistry`].
//! - [`auth::AuthOrchestrator`]: runs a credential submission and an account
//!   eligibility pre-check side by side and turns whatever comes back into a
//!   single [`auth::AuthOutcome`].
//!
//! Everything here is advisory. A hostile client can clear its own storage,
//! so the real enforcement has to live on the server.

pub mod auth;
pub mod clock;
pub mod config;
pub mod events;
pub mod gate;
pub mod secret;
pub mod store;
mod tracing_config;

pub use auth::{
    classify, AccountEligibility, AccountStatus, AuthOrchestrator, AuthOutcome, BlockedReason,
    CredentialSubmitter, EligibilityCheck, ErrorKind,
};
pub use clock::{Clock, SystemClock};
pub use config::{OrchestratorConfig, PortcullisConfig};
pub use events::{register_event_listeners, AuthEvent, Listener};
pub use gate::{
    format_reset_time, Attempt, AttemptGate, GateConfig, GateRegistry, GateStatistics, GateStatus,
};
pub use secret::SecretString;
pub use store::{FileStore, InMemoryStore, KeyValueStore, ScopedStore};
pub use tracing_config::TracingConfig;

#[cfg(any(test, feature = "mocks"))]
pub use auth::{MockCredentialSubmitter, MockEligibilityCheck};
#[cfg(any(test, feature = "mocks"))]
pub use clock::MockClock;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backing store could not be read or written.
    StorageError(String),
    /// The store refused a write because it is full.
    QuotaExceeded,
    Serialization(String),
    GateNotConfigured(String),
    ConfigurationError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::StorageError(msg) => write!(f, "Storage error: {msg}"),
            AuthError::QuotaExceeded => write!(f, "Storage quota exceeded"),
            AuthError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            AuthError::GateNotConfigured(name) => write!(f, "Gate '{name}' not configured"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}
