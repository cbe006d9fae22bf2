use async_trait::async_trait;

use crate::SecretString;

/// The remote sign-in call.
///
/// Success may carry the account's display name. Failures come back as the
/// backend's raw message; the orchestrator classifies them with
/// [`classify`](super::classify).
#[async_trait]
pub trait CredentialSubmitter: Send + Sync {
    async fn submit(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<Option<String>, String>;
}
