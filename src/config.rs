//! Configuration types for portcullis.
//!
//! Centralizes the limits of the standard gates and the knobs of the login
//! orchestrator.
//!
//! # Example
//!
//! ```rust
//! use portcullis::config::{GatesConfig, OrchestratorConfig, PortcullisConfig};
//! use portcullis::GateConfig;
//! use chrono::Duration;
//!
//! // Use defaults
//! let config = PortcullisConfig::default();
//!
//! // Or customize
//! let config = PortcullisConfig {
//!     gates: GatesConfig {
//!         login: GateConfig::new(3, Duration::minutes(30)).storage_key("myapp:login"),
//!         ..Default::default()
//!     },
//!     orchestrator: OrchestratorConfig {
//!         support_contact: "help@myapp.example".to_owned(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! ```

use chrono::Duration;

use crate::gate::GateConfig;
use crate::AuthError;

/// Top-level configuration.
///
/// `PortcullisConfig::default()` gives sensible production limits.
#[derive(Debug, Clone)]
pub struct PortcullisConfig {
    /// Limits of the four standard gates.
    pub gates: GatesConfig,

    /// Login orchestration settings.
    pub orchestrator: OrchestratorConfig,

    /// Optional prefix applied to every storage key, e.g. a profile id.
    ///
    /// Default: none
    pub namespace: Option<String>,
}

impl Default for PortcullisConfig {
    fn default() -> Self {
        Self {
            gates: GatesConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            namespace: None,
        }
    }
}

impl PortcullisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient limits for local development.
    pub fn development() -> Self {
        Self {
            gates: GatesConfig {
                login: GateConfig::login().max_attempts_of(20),
                registration: GateConfig::registration().max_attempts_of(20),
                password_reset: GateConfig::password_reset().max_attempts_of(20),
                email_verification: GateConfig::email_verification().max_attempts_of(20),
            },
            orchestrator: OrchestratorConfig {
                precheck_timeout: Duration::seconds(10),
                ..OrchestratorConfig::default()
            },
            namespace: None,
        }
    }

    /// Tighter limits and a shorter pre-check budget.
    pub fn strict() -> Self {
        Self {
            gates: GatesConfig {
                login: GateConfig::new(3, Duration::minutes(30))
                    .storage_key("portcullis:login")
                    .message("Too many login attempts. Please try again in {reset_time}."),
                registration: GateConfig::new(2, Duration::hours(2))
                    .storage_key("portcullis:registration"),
                password_reset: GateConfig::new(2, Duration::hours(2))
                    .storage_key("portcullis:password-reset"),
                email_verification: GateConfig::new(3, Duration::hours(2))
                    .storage_key("portcullis:email-verification"),
            },
            orchestrator: OrchestratorConfig {
                precheck_timeout: Duration::seconds(2),
                ..OrchestratorConfig::default()
            },
            namespace: None,
        }
    }

    /// # Errors
    ///
    /// Returns the first invalid gate or orchestrator setting.
    pub fn validate(&self) -> Result<(), AuthError> {
        self.gates.login.validate()?;
        self.gates.registration.validate()?;
        self.gates.password_reset.validate()?;
        self.gates.email_verification.validate()?;
        self.orchestrator.validate()
    }
}

/// Configs of the standard gates.
#[derive(Debug, Clone)]
pub struct GatesConfig {
    /// Default: 5 per 15 minutes
    pub login: GateConfig,
    /// Default: 3 per hour
    pub registration: GateConfig,
    /// Default: 3 per hour
    pub password_reset: GateConfig,
    /// Default: 5 per hour
    pub email_verification: GateConfig,
}

impl Default for GatesConfig {
    fn default() -> Self {
        Self {
            login: GateConfig::login(),
            registration: GateConfig::registration(),
            password_reset: GateConfig::password_reset(),
            email_verification: GateConfig::email_verification(),
        }
    }
}

/// Settings of [`AuthOrchestrator`](crate::AuthOrchestrator).
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How long, measured from the start of a submission, a blocked-account
    /// outcome may wait for the eligibility pre-check.
    ///
    /// Default: 3 seconds
    pub precheck_timeout: Duration,

    /// Where blocked users are told to go. Always part of a blocked message.
    ///
    /// Default: `support@example.com`
    pub support_contact: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            precheck_timeout: Duration::seconds(3),
            support_contact: "support@example.com".to_owned(),
        }
    }
}

impl OrchestratorConfig {
    /// The pre-check timeout as a `std` duration for the runtime timer.
    pub(crate) fn precheck_timeout_std(&self) -> std::time::Duration {
        self.precheck_timeout
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    /// # Errors
    ///
    /// Fails on a negative timeout or an empty support contact.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.precheck_timeout < Duration::zero() {
            return Err(AuthError::ConfigurationError(
                "precheck_timeout must not be negative".to_owned(),
            ));
        }
        if self.support_contact.trim().is_empty() {
            return Err(AuthError::ConfigurationError(
                "support_contact must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

impl GateConfig {
    fn max_attempts_of(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}
