//! Events fired by attempt gates and the login orchestrator.
//!
//! Nothing is delivered until listeners are registered, once, at start-up:
//!
//! ```rust,ignore
//! use portcullis::register_event_listeners;
//! use portcullis::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```
//!
//! Delivery is synchronous and never awaited, so a listener cannot hold up
//! a submission.

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AuthEvent;
pub use listener::Listener;
pub(crate) use registry::emit;
pub use registry::{register_event_listeners, EventRegistry};
