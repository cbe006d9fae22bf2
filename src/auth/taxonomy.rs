//! Mapping of raw backend error text onto a closed set of failure kinds.

use std::fmt;

/// Why an account may not sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockedReason {
    Inactive,
    Suspended,
    /// Reported by other users or under manual review.
    Reported,
}

impl BlockedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Reported => "reported",
        }
    }
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified credential-submission failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AccountBlocked(BlockedReason),
    EmailUnverified,
    InvalidCredentials,
    /// The backend throttled us. Distinct from a local gate rejection.
    ServerRateLimited,
    ProfileMissing,
    Generic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountBlocked(_) => "account_blocked",
            Self::EmailUnverified => "email_unverified",
            Self::InvalidCredentials => "invalid_credentials",
            Self::ServerRateLimited => "server_rate_limited",
            Self::ProfileMissing => "profile_missing",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Order matters: the first table with a matching needle wins. Blocked-account
// text is checked before credential text because backend messages for blocked
// accounts often also say "invalid".
const BLOCKED: &[(&str, BlockedReason)] = &[
    ("inactive", BlockedReason::Inactive),
    ("suspended", BlockedReason::Suspended),
    ("reported", BlockedReason::Reported),
    ("under review", BlockedReason::Reported),
];

const EMAIL_UNVERIFIED: &[&str] = &[
    "email not confirmed",
    "not verified",
    "confirm your email",
    "verify your email",
];

const INVALID_CREDENTIALS: &[&str] = &[
    "invalid_credentials",
    "invalid login",
    "invalid",
    "wrong password",
];

const SERVER_RATE_LIMITED: &[&str] = &["too_many_requests", "rate limit"];

const PROFILE_MISSING: &[&str] = &["profile not found"];

/// Classifies a raw error message from the credential backend.
///
/// Case-insensitive substring matching, first match wins, in this order:
/// blocked account, unverified email, invalid credentials, server rate
/// limit, missing profile. Anything else is [`ErrorKind::Generic`].
///
/// ```rust
/// use portcullis::{classify, BlockedReason, ErrorKind};
///
/// assert_eq!(
///     classify("Invalid login credentials suspended test"),
///     ErrorKind::AccountBlocked(BlockedReason::Suspended),
/// );
/// assert_eq!(classify("Invalid login credentials"), ErrorKind::InvalidCredentials);
/// ```
pub fn classify(raw: &str) -> ErrorKind {
    let text = raw.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| text.contains(n));

    if let Some(reason) = blocked_reason_in(&text) {
        ErrorKind::AccountBlocked(reason)
    } else if contains_any(EMAIL_UNVERIFIED) {
        ErrorKind::EmailUnverified
    } else if contains_any(INVALID_CREDENTIALS) {
        ErrorKind::InvalidCredentials
    } else if contains_any(SERVER_RATE_LIMITED) {
        ErrorKind::ServerRateLimited
    } else if contains_any(PROFILE_MISSING) {
        ErrorKind::ProfileMissing
    } else {
        ErrorKind::Generic
    }
}

/// The blocked-account sub-kind named by `raw`, if any.
pub fn blocked_reason(raw: &str) -> Option<BlockedReason> {
    blocked_reason_in(&raw.to_lowercase())
}

fn blocked_reason_in(lowercase: &str) -> Option<BlockedReason> {
    BLOCKED
        .iter()
        .find(|(needle, _)| lowercase.contains(needle))
        .map(|(_, reason)| *reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_variants() {
        assert_eq!(
            classify("Account is inactive"),
            ErrorKind::AccountBlocked(BlockedReason::Inactive)
        );
        assert_eq!(
            classify("Account is suspended"),
            ErrorKind::AccountBlocked(BlockedReason::Suspended)
        );
        assert_eq!(
            classify("This account has been REPORTED"),
            ErrorKind::AccountBlocked(BlockedReason::Reported)
        );
        assert_eq!(
            classify("Account under review"),
            ErrorKind::AccountBlocked(BlockedReason::Reported)
        );
    }

    #[test]
    fn test_blocked_beats_invalid() {
        assert_eq!(
            classify("Invalid login credentials suspended test"),
            ErrorKind::AccountBlocked(BlockedReason::Suspended)
        );
    }

    #[test]
    fn test_sub_kind_priority() {
        // inactive is checked before suspended, suspended before reported
        assert_eq!(
            blocked_reason("suspended and inactive"),
            Some(BlockedReason::Inactive)
        );
        assert_eq!(
            blocked_reason("reported, now suspended"),
            Some(BlockedReason::Suspended)
        );
        assert_eq!(blocked_reason("wrong password"), None);
    }

    #[test]
    fn test_email_unverified() {
        assert_eq!(classify("Email not confirmed"), ErrorKind::EmailUnverified);
        assert_eq!(classify("User is not verified"), ErrorKind::EmailUnverified);
        assert_eq!(
            classify("Please confirm your email first"),
            ErrorKind::EmailUnverified
        );
        assert_eq!(
            classify("Verify your email to continue"),
            ErrorKind::EmailUnverified
        );
    }

    #[test]
    fn test_unverified_beats_invalid() {
        assert_eq!(
            classify("invalid: email not confirmed"),
            ErrorKind::EmailUnverified
        );
    }

    #[test]
    fn test_invalid_credentials() {
        assert_eq!(classify("invalid_credentials"), ErrorKind::InvalidCredentials);
        assert_eq!(
            classify("Invalid login credentials"),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(classify("Wrong password"), ErrorKind::InvalidCredentials);
        assert_eq!(classify("token invalid"), ErrorKind::InvalidCredentials);
    }

    #[test]
    fn test_server_rate_limited() {
        assert_eq!(classify("too_many_requests"), ErrorKind::ServerRateLimited);
        assert_eq!(
            classify("Email rate limit exceeded"),
            ErrorKind::ServerRateLimited
        );
    }

    #[test]
    fn test_profile_missing() {
        assert_eq!(classify("Profile not found"), ErrorKind::ProfileMissing);
    }

    #[test]
    fn test_generic() {
        assert_eq!(classify("Network request failed"), ErrorKind::Generic);
        assert_eq!(classify(""), ErrorKind::Generic);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            ErrorKind::AccountBlocked(BlockedReason::Reported).to_string(),
            "account_blocked"
        );
        assert_eq!(BlockedReason::Reported.to_string(), "reported");
        assert_eq!(ErrorKind::ServerRateLimited.as_str(), "server_rate_limited");
    }
}
