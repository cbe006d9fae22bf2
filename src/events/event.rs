use chrono::{DateTime, Utc};

/// Something that happened at a gate or during a sign-in.
///
/// Timestamps come from the gate's clock, so they line up with the attempt
/// timestamps it stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// [`AttemptGate::record_attempt`](crate::AttemptGate::record_attempt) ran.
    ///
    /// `persisted` is `false` when the store could not be read or written.
    AttemptRecorded {
        gate: String,
        identifier: Option<String>,
        persisted: bool,
        at: DateTime<Utc>,
    },
    /// The gate refused a submission before any network call.
    AttemptRejected {
        gate: String,
        identifier: Option<String>,
        reset_in: String,
        at: DateTime<Utc>,
    },
    LoginSucceeded {
        identifier: String,
        display_name: Option<String>,
        at: DateTime<Utc>,
    },
    LoginFailed {
        identifier: String,
        kind: &'static str,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AttemptRecorded { .. } => "gate.attempt.recorded",
            Self::AttemptRejected { .. } => "gate.attempt.rejected",
            Self::LoginSucceeded { .. } => "auth.login.success",
            Self::LoginFailed { .. } => "auth.login.failed",
        }
    }

    /// Name of the gate involved, for gate-level events.
    pub fn gate(&self) -> Option<&str> {
        match self {
            Self::AttemptRecorded { gate, .. } | Self::AttemptRejected { gate, .. } => Some(gate),
            Self::LoginSucceeded { .. } | Self::LoginFailed { .. } => None,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AttemptRecorded { at, .. }
            | Self::AttemptRejected { at, .. }
            | Self::LoginSucceeded { at, .. }
            | Self::LoginFailed { at, .. } => *at,
        }
    }
}
