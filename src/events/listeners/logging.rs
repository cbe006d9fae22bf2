use crate::events::{AuthEvent, Listener};

/// Writes events to the `log` crate under the `portcullis::events` target.
///
/// Routine events go out at the configured level. A rejected submission or
/// an attempt the store lost goes out at `warn` regardless, since either one
/// means a user is being throttled or is not being counted.
///
/// ```rust,ignore
/// use portcullis::register_event_listeners;
/// use portcullis::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::with_level(log::Level::Debug));
/// });
/// ```
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &AuthEvent) -> log::Level {
        match event {
            AuthEvent::AttemptRejected { .. }
            | AuthEvent::AttemptRecorded {
                persisted: false, ..
            } => log::Level::Warn,
            _ => self.level,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for LoggingListener {
    fn handle(&self, event: &AuthEvent) {
        let level = self.level_for(event);
        match event {
            AuthEvent::AttemptRecorded {
                gate,
                identifier,
                persisted,
                ..
            } => log::log!(
                target: "portcullis::events",
                level,
                "event={} gate=\"{gate}\" identifier={identifier:?} persisted={persisted}",
                event.name()
            ),
            AuthEvent::AttemptRejected {
                gate,
                identifier,
                reset_in,
                ..
            } => log::log!(
                target: "portcullis::events",
                level,
                "event={} gate=\"{gate}\" identifier={identifier:?} reset_in=\"{reset_in}\"",
                event.name()
            ),
            AuthEvent::LoginSucceeded { identifier, .. } => log::log!(
                target: "portcullis::events",
                level,
                "event={} identifier=\"{identifier}\"",
                event.name()
            ),
            AuthEvent::LoginFailed {
                identifier, kind, ..
            } => log::log!(
                target: "portcullis::events",
                level,
                "event={} identifier=\"{identifier}\" kind=\"{kind}\"",
                event.name()
            ),
        }
    }
}
