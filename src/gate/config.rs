use chrono::Duration;

use crate::AuthError;

/// Placeholder replaced by the formatted reset time in gate messages.
pub const RESET_TIME_PLACEHOLDER: &str = "{reset_time}";

/// Longest window a gate accepts.
pub const MAX_WINDOW_DAYS: i64 = 366;

pub(crate) const DEFAULT_MESSAGE: &str = "Too many attempts. Please try again in {reset_time}.";

/// Static configuration of one named gate.
///
/// ```rust
/// use portcullis::GateConfig;
/// use chrono::Duration;
///
/// let config = GateConfig::new(5, Duration::minutes(15))
///     .storage_key("myapp:login")
///     .message("Too many login attempts. Try again in {reset_time}.");
///
/// assert_eq!(config.max_attempts(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub(crate) max_attempts: u32,
    pub(crate) window: Duration,
    pub(crate) storage_key: String,
    pub(crate) message: Option<String>,
}

impl GateConfig {
    /// The storage key defaults to `portcullis:gate` and should normally be
    /// overridden with [`GateConfig::storage_key`].
    #[must_use]
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            storage_key: "portcullis:gate".to_owned(),
            message: None,
        }
    }

    #[must_use]
    pub fn per_minute(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::minutes(1))
    }

    #[must_use]
    pub fn per_hour(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::hours(1))
    }

    /// 5 attempts per 15 minutes.
    #[must_use]
    pub fn login() -> Self {
        Self::new(5, Duration::minutes(15))
            .storage_key("portcullis:login")
            .message("Too many login attempts. Please try again in {reset_time}.")
    }

    /// 3 attempts per hour.
    #[must_use]
    pub fn registration() -> Self {
        Self::per_hour(3)
            .storage_key("portcullis:registration")
            .message("Too many registration attempts. Please try again in {reset_time}.")
    }

    /// 3 attempts per hour.
    #[must_use]
    pub fn password_reset() -> Self {
        Self::per_hour(3)
            .storage_key("portcullis:password-reset")
            .message("Too many password reset requests. Please try again in {reset_time}.")
    }

    /// 5 attempts per hour.
    #[must_use]
    pub fn email_verification() -> Self {
        Self::per_hour(5)
            .storage_key("portcullis:email-verification")
            .message("Too many verification emails requested. Please try again in {reset_time}.")
    }

    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the blocked message. `{reset_time}` is substituted on render.
    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn get_storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn get_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Renders the blocked message for a given formatted reset time.
    pub fn render_message(&self, reset_time: &str) -> String {
        self.message
            .as_deref()
            .unwrap_or(DEFAULT_MESSAGE)
            .replace(RESET_TIME_PLACEHOLDER, reset_time)
    }

    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationError`] for a zero attempt budget, a
    /// window that is not positive or longer than [`MAX_WINDOW_DAYS`], or an
    /// empty storage key.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.max_attempts == 0 {
            return Err(AuthError::ConfigurationError(
                "max_attempts must be greater than zero".to_owned(),
            ));
        }
        if self.window <= Duration::zero() {
            return Err(AuthError::ConfigurationError(
                "window must be positive".to_owned(),
            ));
        }
        if self.window > Duration::days(MAX_WINDOW_DAYS) {
            return Err(AuthError::ConfigurationError(format!(
                "window must not exceed {MAX_WINDOW_DAYS} days"
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(AuthError::ConfigurationError(
                "storage_key must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
