use serde::Serialize;

use super::eligibility::AccountEligibility;
use super::taxonomy::{BlockedReason, ErrorKind};

/// Terminal result of one submission. Exactly one is produced per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthOutcome {
    /// Signed in. Carries the display name when the backend returned one.
    Success { display_name: Option<String> },
    /// The local gate refused the submission; no request was sent.
    Rejected { message: String, reset_in: String },
    Blocked {
        #[serde(serialize_with = "serialize_reason")]
        reason: BlockedReason,
        message: String,
        display_name: Option<String>,
    },
    NeedsVerification { message: String },
    InvalidCredentials { message: String },
    /// Server-side throttling, a missing profile, or an unrecognized error.
    GenericError {
        #[serde(serialize_with = "serialize_kind")]
        error: ErrorKind,
        message: String,
    },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Rejected { message, .. }
            | Self::Blocked { message, .. }
            | Self::NeedsVerification { message }
            | Self::InvalidCredentials { message }
            | Self::GenericError { message, .. } => Some(message),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Success { display_name } | Self::Blocked { display_name, .. } => {
                display_name.as_deref()
            }
            _ => None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Rejected { .. } => "rejected",
            Self::Blocked { .. } => "blocked",
            Self::NeedsVerification { .. } => "needs_verification",
            Self::InvalidCredentials { .. } => "invalid_credentials",
            Self::GenericError { .. } => "generic_error",
        }
    }
}

/// Builds the user-facing outcome for a classified failure that is not a
/// blocked account.
pub(crate) fn failure_outcome(kind: ErrorKind, raw: &str, support_contact: &str) -> AuthOutcome {
    match kind {
        ErrorKind::EmailUnverified => AuthOutcome::NeedsVerification {
            message: "Please verify your email address before signing in. \
                      Check your inbox for the confirmation link."
                .to_owned(),
        },
        ErrorKind::InvalidCredentials => AuthOutcome::InvalidCredentials {
            message: "Invalid email or password.".to_owned(),
        },
        ErrorKind::ServerRateLimited => AuthOutcome::GenericError {
            error: kind,
            message: "Too many requests. Please wait a moment and try again.".to_owned(),
        },
        ErrorKind::ProfileMissing => AuthOutcome::GenericError {
            error: kind,
            message: format!(
                "We could not find a profile for this account. Please contact {support_contact}."
            ),
        },
        ErrorKind::Generic => AuthOutcome::GenericError {
            error: kind,
            message: if raw.trim().is_empty() {
                "Something went wrong. Please try again.".to_owned()
            } else {
                raw.trim().to_owned()
            },
        },
        ErrorKind::AccountBlocked(reason) => blocked_outcome(reason, None, support_contact),
    }
}

/// Builds the blocked-account outcome.
///
/// A pre-check answer that names a blocked status supplies the sub-kind,
/// message and display name. Without one, everything is derived from
/// `fallback`, the sub-kind read from the raw error text.
pub(crate) fn blocked_outcome(
    fallback: BlockedReason,
    eligibility: Option<AccountEligibility>,
    support_contact: &str,
) -> AuthOutcome {
    let remedy = format!("Please contact {support_contact} for assistance.");

    match eligibility {
        Some(eligibility) if eligibility.status.blocked_reason().is_some() => {
            let reason = eligibility.status.blocked_reason().unwrap_or(fallback);
            let base = eligibility.message.trim();
            let base = if base.is_empty() {
                default_blocked_message(reason)
            } else {
                base
            };

            let message = if base.contains(support_contact) {
                base.to_owned()
            } else {
                format!("{base} {remedy}")
            };

            AuthOutcome::Blocked {
                reason,
                message,
                display_name: eligibility.display_name,
            }
        }
        _ => AuthOutcome::Blocked {
            reason: fallback,
            message: format!("{} {remedy}", default_blocked_message(fallback)),
            display_name: None,
        },
    }
}

fn default_blocked_message(reason: BlockedReason) -> &'static str {
    match reason {
        BlockedReason::Inactive => "Your account is inactive.",
        BlockedReason::Suspended => "Your account has been suspended.",
        BlockedReason::Reported => "Your account is under review.",
    }
}

fn serialize_reason<S>(reason: &BlockedReason, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(reason.as_str())
}

fn serialize_kind<S>(kind: &ErrorKind, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::eligibility::AccountStatus;

    const SUPPORT: &str = "help@x.com";

    #[test]
    fn test_heuristic_blocked_message_has_remedy() {
        let outcome = blocked_outcome(BlockedReason::Suspended, None, SUPPORT);

        assert_eq!(
            outcome,
            AuthOutcome::Blocked {
                reason: BlockedReason::Suspended,
                message: "Your account has been suspended. Please contact help@x.com for assistance."
                    .to_owned(),
                display_name: None,
            }
        );
    }

    #[test]
    fn test_precheck_supplies_reason_and_name() {
        let eligibility = AccountEligibility::blocked(AccountStatus::Reported, "Flagged by users.")
            .with_display_name("Ada");

        let outcome = blocked_outcome(BlockedReason::Suspended, Some(eligibility), SUPPORT);

        assert_eq!(
            outcome,
            AuthOutcome::Blocked {
                reason: BlockedReason::Reported,
                message: "Flagged by users. Please contact help@x.com for assistance.".to_owned(),
                display_name: Some("Ada".to_owned()),
            }
        );
    }

    #[test]
    fn test_precheck_message_with_contact_is_kept() {
        let eligibility = AccountEligibility::blocked(
            AccountStatus::Inactive,
            "Inactive. Write to help@x.com to reactivate.",
        );

        let outcome = blocked_outcome(BlockedReason::Inactive, Some(eligibility), SUPPORT);
        assert_eq!(
            outcome.message(),
            Some("Inactive. Write to help@x.com to reactivate.")
        );
    }

    #[test]
    fn test_non_blocking_precheck_is_ignored() {
        let eligibility = AccountEligibility::active().with_display_name("Ada");

        let outcome = blocked_outcome(BlockedReason::Inactive, Some(eligibility), SUPPORT);

        assert_eq!(outcome.display_name(), None);
        assert!(matches!(
            outcome,
            AuthOutcome::Blocked {
                reason: BlockedReason::Inactive,
                ..
            }
        ));
    }

    #[test]
    fn test_failure_outcomes() {
        assert!(matches!(
            failure_outcome(ErrorKind::EmailUnverified, "Email not confirmed", SUPPORT),
            AuthOutcome::NeedsVerification { .. }
        ));
        assert_eq!(
            failure_outcome(ErrorKind::InvalidCredentials, "invalid", SUPPORT).message(),
            Some("Invalid email or password.")
        );
        assert!(matches!(
            failure_outcome(ErrorKind::ServerRateLimited, "rate limit", SUPPORT),
            AuthOutcome::GenericError {
                error: ErrorKind::ServerRateLimited,
                ..
            }
        ));
        assert!(failure_outcome(ErrorKind::ProfileMissing, "", SUPPORT)
            .message()
            .is_some_and(|m| m.contains(SUPPORT)));
    }

    #[test]
    fn test_generic_surfaces_raw_message() {
        assert_eq!(
            failure_outcome(ErrorKind::Generic, "  Gateway timeout ", SUPPORT).message(),
            Some("Gateway timeout")
        );
        assert_eq!(
            failure_outcome(ErrorKind::Generic, "", SUPPORT).message(),
            Some("Something went wrong. Please try again.")
        );
    }

    #[test]
    fn test_success_carries_display_name() {
        let outcome = AuthOutcome::Success {
            display_name: Some("Ada".to_owned()),
        };

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), None);
        assert_eq!(outcome.display_name(), Some("Ada"));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["display_name"], "Ada");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(AuthOutcome::Rejected {
            message: "Too many attempts. Please try again in 45s.".to_owned(),
            reset_in: "45s".to_owned(),
        })
        .unwrap();

        assert_eq!(json["kind"], "rejected");
        assert_eq!(json["reset_in"], "45s");

        let json = serde_json::to_value(blocked_outcome(BlockedReason::Reported, None, SUPPORT))
            .unwrap();
        assert_eq!(json["reason"], "reported");
    }
}
