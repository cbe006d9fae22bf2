//! Sliding-window attempt gates.
//!
//! An [`AttemptGate`] throttles one kind of action. Several of them, each
//! under its own storage key, live together in a [`GateRegistry`].

mod attempt;
mod attempt_gate;
mod config;
pub mod registry;
mod status;

pub use attempt::Attempt;
pub use attempt_gate::AttemptGate;
pub use config::{GateConfig, MAX_WINDOW_DAYS, RESET_TIME_PLACEHOLDER};
pub use registry::GateRegistry;
pub use status::{format_reset_time, GateStatistics, GateStatus};
