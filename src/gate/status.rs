use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Result of [`AttemptGate::check_limit`](super::AttemptGate::check_limit).
///
/// Computed on every check; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateStatus {
    pub allowed: bool,
    pub remaining_attempts: u32,
    /// Time until the oldest counted attempt leaves the window. Zero when allowed.
    #[serde(serialize_with = "serialize_seconds")]
    pub reset_in: Duration,
    pub reset_in_formatted: String,
    /// Rendered blocked message. `None` when allowed.
    pub message: Option<String>,
}

impl GateStatus {
    pub(crate) fn allowed(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            remaining_attempts,
            reset_in: Duration::zero(),
            reset_in_formatted: format_reset_time(Duration::zero()),
            message: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        !self.allowed
    }
}

/// In-window aggregate for debugging and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GateStatistics {
    pub total_attempts: usize,
    /// Distinct identifiers; attempts without one are not counted here.
    pub unique_identifiers: usize,
    pub oldest_attempt: Option<DateTime<Utc>>,
    pub newest_attempt: Option<DateTime<Utc>>,
}

/// Renders a wait as `"1h 5m"`, `"3m 20s"`, `"45s"` or `"now"`.
///
/// Partial seconds round up so the display never says `"0s"` while the gate
/// is still closed.
pub fn format_reset_time(remaining: Duration) -> String {
    let millis = remaining.num_milliseconds();
    if millis <= 0 {
        return "now".to_owned();
    }

    let total_secs = (millis + 999) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn serialize_seconds<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}
