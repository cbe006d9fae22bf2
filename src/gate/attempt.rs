use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One gated action, as persisted under a gate's storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Attempt {
    pub fn new(timestamp: DateTime<Utc>, identifier: Option<String>) -> Self {
        Self {
            timestamp,
            identifier,
        }
    }

    /// Whether the attempt still counts for a window that began at `window_start`.
    ///
    /// The boundary is exclusive: an attempt made exactly one window ago has expired.
    pub fn is_after(&self, window_start: DateTime<Utc>) -> bool {
        self.timestamp > window_start
    }

    pub fn matches(&self, identifier: Option<&str>) -> bool {
        match identifier {
            Some(id) => self.identifier.as_deref() == Some(id),
            None => true,
        }
    }
}

/// Trims and lower-cases an identifier so `A@x.com ` and `a@x.com` share a counter.
/// Blank identifiers are treated as absent.
pub(crate) fn normalize_identifier(identifier: Option<&str>) -> Option<String> {
    identifier
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_lowercase)
}
