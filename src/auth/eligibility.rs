use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::taxonomy::BlockedReason;

/// Account state reported by the eligibility lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    Reported,
    PendingVerification,
    #[serde(other)]
    Unknown,
}

impl AccountStatus {
    /// The blocked-account sub-kind this status stands for, if it is one.
    pub fn blocked_reason(&self) -> Option<BlockedReason> {
        match self {
            Self::Inactive => Some(BlockedReason::Inactive),
            Self::Suspended => Some(BlockedReason::Suspended),
            Self::Reported => Some(BlockedReason::Reported),
            Self::Active | Self::PendingVerification | Self::Unknown => None,
        }
    }
}

/// Result of the eligibility pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEligibility {
    pub can_proceed: bool,
    #[serde(rename = "statusCode")]
    pub status: AccountStatus,
    pub message: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl AccountEligibility {
    pub fn active() -> Self {
        Self {
            can_proceed: true,
            status: AccountStatus::Active,
            message: String::new(),
            display_name: None,
        }
    }

    pub fn blocked(status: AccountStatus, message: impl Into<String>) -> Self {
        Self {
            can_proceed: false,
            status,
            message: message.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Read-only lookup of whether an account may currently sign in.
///
/// Runs alongside the credential submission and only matters when the
/// submission fails with a blocked-account error.
#[async_trait]
pub trait EligibilityCheck: Send + Sync {
    /// Errors are opaque messages; any error is treated as "no answer".
    async fn check(&self, identifier: &str) -> Result<AccountEligibility, String>;
}
