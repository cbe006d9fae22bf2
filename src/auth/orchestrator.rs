use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::credentials::CredentialSubmitter;
use super::eligibility::{AccountEligibility, EligibilityCheck};
use super::outcome::{blocked_outcome, failure_outcome, AuthOutcome};
use super::taxonomy::{classify, ErrorKind};
use crate::config::OrchestratorConfig;
use crate::events::{emit, AuthEvent};
use crate::gate::AttemptGate;
use crate::{AuthError, SecretString};

#[cfg(feature = "tracing")]
use crate::TracingConfig;

/// Runs one sign-in submission end to end.
///
/// The gate is consulted first. If it allows the attempt, the credential
/// submission and the eligibility pre-check start together and are polled
/// side by side on the calling task. A successful submission wins outright
/// and the pre-check is dropped. A failed one is counted against the gate
/// before anything else happens, then classified; only a blocked-account
/// failure waits for the pre-check, and never past `precheck_timeout`
/// measured from the start of the submission.
///
/// Every submission gets a sequence number. A pre-check answer from a
/// submission that is no longer the latest is discarded, and
/// [`latest_outcome`](Self::latest_outcome) only ever moves forward.
///
/// # Example
///
/// ```rust,ignore
/// use portcullis::{AuthOrchestrator, GateRegistry, InMemoryStore, SecretString};
/// use portcullis::gate::registry::LOGIN;
/// use std::sync::Arc;
///
/// let gates = GateRegistry::standard(Arc::new(InMemoryStore::new()))?;
/// let orchestrator = AuthOrchestrator::new(gates.gate(LOGIN).unwrap(), backend, lookup);
///
/// match orchestrator.submit("a@x.com", &SecretString::new(password)).await {
///     AuthOutcome::Success { display_name } => greet(display_name),
///     other => show_error(other.message()),
/// }
/// ```
pub struct AuthOrchestrator<C: CredentialSubmitter, E: EligibilityCheck> {
    gate: Arc<AttemptGate>,
    submitter: C,
    eligibility: E,
    config: OrchestratorConfig,
    sequence: AtomicU64,
    latest: Mutex<Option<(u64, AuthOutcome)>>,
    #[cfg(feature = "tracing")]
    tracing: Option<TracingConfig>,
}

impl<C: CredentialSubmitter, E: EligibilityCheck> AuthOrchestrator<C, E> {
    pub fn new(gate: Arc<AttemptGate>, submitter: C, eligibility: E) -> Self {
        Self::build(gate, submitter, eligibility, OrchestratorConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationError`] if the config is invalid.
    pub fn with_config(
        gate: Arc<AttemptGate>,
        submitter: C,
        eligibility: E,
        config: OrchestratorConfig,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self::build(gate, submitter, eligibility, config))
    }

    fn build(
        gate: Arc<AttemptGate>,
        submitter: C,
        eligibility: E,
        config: OrchestratorConfig,
    ) -> Self {
        AuthOrchestrator {
            gate,
            submitter,
            eligibility,
            config,
            sequence: AtomicU64::new(0),
            latest: Mutex::new(None),
            #[cfg(feature = "tracing")]
            tracing: None,
        }
    }

    #[cfg(feature = "tracing")]
    #[must_use]
    pub fn with_tracing(mut self) -> Self {
        self.tracing = Some(TracingConfig::default());
        self
    }

    #[cfg(feature = "tracing")]
    #[must_use]
    pub fn with_tracing_config(mut self, config: TracingConfig) -> Self {
        self.tracing = Some(config);
        self
    }

    pub fn gate(&self) -> &Arc<AttemptGate> {
        &self.gate
    }

    /// Sequence number of the most recently started submission; 0 before any.
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Outcome of the newest submission that has finished.
    pub fn latest_outcome(&self) -> Option<AuthOutcome> {
        self.latest
            .lock()
            .ok()
            .and_then(|latest| latest.as_ref().map(|(_, outcome)| outcome.clone()))
    }

    pub async fn submit(&self, identifier: &str, secret: &SecretString) -> AuthOutcome {
        #[cfg(feature = "tracing")]
        {
            if let Some(ref config) = self.tracing {
                use tracing::Instrument;
                let span = tracing::info_span!("action", name = config.span_name);
                let outcome = self.submit_inner(identifier, secret).instrument(span).await;
                tracing::info!(outcome = outcome.name(), "submission resolved");
                return outcome;
            }
        }

        self.submit_inner(identifier, secret).await
    }

    async fn submit_inner(&self, identifier: &str, secret: &SecretString) -> AuthOutcome {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let status = self.gate.check_limit(Some(identifier));
        if !status.allowed {
            log::info!(
                target: "portcullis",
                "msg=\"submission rejected by gate\", gate=\"{}\", reset_in=\"{}\"",
                self.gate.name(),
                status.reset_in_formatted
            );
            emit(AuthEvent::AttemptRejected {
                gate: self.gate.name().to_owned(),
                identifier: Some(identifier.to_owned()),
                reset_in: status.reset_in_formatted.clone(),
                at: self.gate.now(),
            });

            let message = status
                .message
                .unwrap_or_else(|| self.gate.config().render_message(&status.reset_in_formatted));
            return self.publish(
                sequence,
                AuthOutcome::Rejected {
                    message,
                    reset_in: status.reset_in_formatted,
                },
            );
        }

        let deadline = tokio::time::Instant::now() + self.config.precheck_timeout_std();

        let submission = self.submitter.submit(identifier, secret);
        let precheck = self.eligibility.check(identifier);
        tokio::pin!(submission);
        tokio::pin!(precheck);

        let mut early_precheck: Option<Result<AccountEligibility, String>> = None;
        let submitted = loop {
            tokio::select! {
                biased;
                result = &mut submission => break result,
                result = &mut precheck, if early_precheck.is_none() => {
                    early_precheck = Some(result);
                }
            }
        };

        let raw = match submitted {
            Ok(display_name) => {
                log::info!(target: "portcullis", "msg=\"login succeeded\"");
                emit(AuthEvent::LoginSucceeded {
                    identifier: identifier.to_owned(),
                    display_name: display_name.clone(),
                    at: self.gate.now(),
                });
                return self.publish(sequence, AuthOutcome::Success { display_name });
            }
            Err(raw) => raw,
        };

        // counted before anything below can stall on the pre-check
        let recorded = self.gate.record_attempt(Some(identifier));
        let kind = classify(&raw);

        log::info!(
            target: "portcullis",
            "msg=\"login failed\", kind=\"{kind}\", recorded={recorded}"
        );

        let outcome = match kind {
            ErrorKind::AccountBlocked(fallback) => {
                let answer = match early_precheck {
                    Some(result) => result,
                    None => tokio::time::timeout_at(deadline, &mut precheck)
                        .await
                        .unwrap_or_else(|_| Err("eligibility pre-check timed out".to_owned())),
                };

                let eligibility = match answer {
                    Ok(_) if !self.is_current(sequence) => {
                        log::debug!(
                            target: "portcullis",
                            "msg=\"discarding stale pre-check\", sequence={sequence}"
                        );
                        None
                    }
                    Ok(eligibility) => Some(eligibility),
                    Err(e) => {
                        log::warn!(
                            target: "portcullis",
                            "msg=\"eligibility pre-check unavailable\", error=\"{e}\""
                        );
                        None
                    }
                };

                blocked_outcome(fallback, eligibility, &self.config.support_contact)
            }
            other => failure_outcome(other, &raw, &self.config.support_contact),
        };

        emit(AuthEvent::LoginFailed {
            identifier: identifier.to_owned(),
            kind: kind.as_str(),
            at: self.gate.now(),
        });

        self.publish(sequence, outcome)
    }

    fn is_current(&self, sequence: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == sequence
    }

    /// Stores `outcome` as the latest unless a newer submission already finished.
    fn publish(&self, sequence: u64, outcome: AuthOutcome) -> AuthOutcome {
        if let Ok(mut latest) = self.latest.lock() {
            let newer_exists = latest.as_ref().is_some_and(|(seen, _)| *seen > sequence);
            if newer_exists {
                log::debug!(
                    target: "portcullis",
                    "msg=\"outcome superseded\", sequence={sequence}, outcome=\"{}\"",
                    outcome.name()
                );
            } else {
                *latest = Some((sequence, outcome.clone()));
            }
        }
        outcome
    }
}

impl<C: CredentialSubmitter, E: EligibilityCheck> std::fmt::Debug for AuthOrchestrator<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOrchestrator")
            .field("gate", &self.gate.name())
            .field("config", &self.config)
            .field("sequence", &self.current_sequence())
            .finish_non_exhaustive()
    }
}
