//! Scripted collaborators for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::credentials::CredentialSubmitter;
use super::eligibility::{AccountEligibility, EligibilityCheck};
use crate::SecretString;

type Scripted<T> = (Duration, T);

/// Credential backend that answers from a script.
///
/// Queued responses are used first, one per call; after that every call
/// gets `default_response`. Each response is delivered after its delay.
pub struct MockCredentialSubmitter {
    pub responses: Mutex<VecDeque<Scripted<Result<Option<String>, String>>>>,
    pub default_response: Scripted<Result<Option<String>, String>>,
    pub calls: AtomicUsize,
}

impl MockCredentialSubmitter {
    pub fn succeeding() -> Self {
        Self::responding(Ok(None))
    }

    pub fn succeeding_as(display_name: impl Into<String>) -> Self {
        Self::responding(Ok(Some(display_name.into())))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::responding(Err(message.into()))
    }

    fn responding(response: Result<Option<String>, String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: (Duration::ZERO, response),
            calls: AtomicUsize::new(0),
        }
    }

    /// Delays the default response.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.default_response.0 = delay;
        self
    }

    /// Queues a one-off response ahead of the default.
    #[must_use]
    pub fn then_respond(
        self,
        delay: Duration,
        response: Result<Option<String>, String>,
    ) -> Self {
        self.responses.lock().unwrap().push_back((delay, response));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialSubmitter for MockCredentialSubmitter {
    async fn submit(
        &self,
        _identifier: &str,
        _secret: &SecretString,
    ) -> Result<Option<String>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let queued = self.responses.lock().unwrap().pop_front();
        let (delay, response) = queued.unwrap_or_else(|| self.default_response.clone());

        tokio::time::sleep(delay).await;
        response
    }
}

/// Eligibility lookup that answers from a script.
///
/// A `None` response never resolves, which is how a hung lookup is modelled.
pub struct MockEligibilityCheck {
    pub responses: Mutex<VecDeque<Scripted<Option<Result<AccountEligibility, String>>>>>,
    pub default_response: Scripted<Option<Result<AccountEligibility, String>>>,
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
}

impl MockEligibilityCheck {
    pub fn answering(eligibility: AccountEligibility) -> Self {
        Self::responding(Some(Ok(eligibility)))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::responding(Some(Err(message.into())))
    }

    pub fn hanging() -> Self {
        Self::responding(None)
    }

    fn responding(response: Option<Result<AccountEligibility, String>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response: (Duration::ZERO, response),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.default_response.0 = delay;
        self
    }

    #[must_use]
    pub fn then_respond(
        self,
        delay: Duration,
        response: Option<Result<AccountEligibility, String>>,
    ) -> Self {
        self.responses.lock().unwrap().push_back((delay, response));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Lookups that ran to completion (not dropped, not hung).
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EligibilityCheck for MockEligibilityCheck {
    async fn check(&self, _identifier: &str) -> Result<AccountEligibility, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let queued = self.responses.lock().unwrap().pop_front();
        let (delay, response) = queued.unwrap_or_else(|| self.default_response.clone());

        tokio::time::sleep(delay).await;
        match response {
            Some(response) => {
                self.completed.fetch_add(1, Ordering::SeqCst);
                response
            }
            None => std::future::pending().await,
        }
    }
}
