use super::AuthEvent;

/// Receives events from gates and the orchestrator.
///
/// `handle` runs synchronously on the thread that produced the event, in
/// the middle of a gate operation or a submission, so it must return
/// quickly. Hand anything slow to a channel or a spawned task. A panic is
/// caught and logged; it never reaches the gate or the orchestrator.
///
/// # Example
///
/// ```rust,ignore
/// use portcullis::events::{AuthEvent, Listener};
///
/// struct LockoutBanner(tokio::sync::mpsc::UnboundedSender<String>);
///
/// impl Listener for LockoutBanner {
///     fn wants(&self, event: &AuthEvent) -> bool {
///         matches!(event, AuthEvent::AttemptRejected { .. })
///     }
///
///     fn handle(&self, event: &AuthEvent) {
///         if let AuthEvent::AttemptRejected { reset_in, .. } = event {
///             let _ = self.0.send(reset_in.clone());
///         }
///     }
/// }
/// ```
pub trait Listener: Send + Sync + 'static {
    /// Filters events before [`handle`](Self::handle). Accepts everything by default.
    fn wants(&self, _event: &AuthEvent) -> bool {
        true
    }

    fn handle(&self, event: &AuthEvent);
}
