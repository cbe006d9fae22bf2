use crate::events::{AuthEvent, Listener};

/// Emits events through `tracing`, inside whatever span is current, so a
/// submission's events nest under its `auth_submit` span. Requires the
/// `tracing` feature.
pub struct TracingListener;

impl Listener for TracingListener {
    fn handle(&self, event: &AuthEvent) {
        match event {
            AuthEvent::AttemptRejected {
                gate, reset_in, ..
            } => tracing::warn!(
                target: "portcullis::events",
                event_name = event.name(),
                gate = %gate,
                reset_in = %reset_in,
                "attempt rejected"
            ),
            AuthEvent::AttemptRecorded {
                gate, persisted, ..
            } => tracing::info!(
                target: "portcullis::events",
                event_name = event.name(),
                gate = %gate,
                persisted = *persisted,
                "attempt recorded"
            ),
            AuthEvent::LoginSucceeded { .. } => tracing::info!(
                target: "portcullis::events",
                event_name = event.name(),
                "login succeeded"
            ),
            AuthEvent::LoginFailed { kind, .. } => tracing::info!(
                target: "portcullis::events",
                event_name = event.name(),
                kind = *kind,
                "login failed"
            ),
        }
    }
}
