//! Sign-in orchestration.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`AuthOrchestrator`] | Gate check, concurrent submission and pre-check, reconciliation |
//! | [`CredentialSubmitter`] | The remote sign-in call |
//! | [`EligibilityCheck`] | The remote account-status lookup |
//! | [`classify`] | Raw backend error text to [`ErrorKind`] |
//! | [`AuthOutcome`] | What the UI shows |
//!
//! Enable the `mocks` feature for [`MockCredentialSubmitter`] and
//! [`MockEligibilityCheck`].

mod credentials;
mod eligibility;
#[cfg(any(test, feature = "mocks"))]
mod mocks;
mod orchestrator;
mod outcome;
mod taxonomy;

pub use credentials::CredentialSubmitter;
pub use eligibility::{AccountEligibility, AccountStatus, EligibilityCheck};
#[cfg(any(test, feature = "mocks"))]
pub use mocks::{MockCredentialSubmitter, MockEligibilityCheck};
pub use orchestrator::AuthOrchestrator;
pub use outcome::AuthOutcome;
pub use taxonomy::{blocked_reason, classify, BlockedReason, ErrorKind};
