/// Span naming for instrumented orchestration.
///
/// Only consulted when the `tracing` feature is enabled.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Name recorded on the span wrapping one submission.
    pub span_name: &'static str,
}

impl TracingConfig {
    pub fn new(span_name: &'static str) -> Self {
        Self { span_name }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            span_name: "auth_submit",
        }
    }
}
