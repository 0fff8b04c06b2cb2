//! DockGen Poller
//!
//! Watches a Dockerfile generation job until it finishes.
//!
//! Architecture:
//! - Configuration: poll delays and budgets, from environment or defaults
//! - Source: the status-query capability the poller depends on
//! - Policy: pure continue/stop decisions
//! - State: per-session state machine applying the policy
//! - Session: tokio task driving one state machine against a source
//!
//! A session queries the source once after a short initial delay and then at
//! a fixed interval, one query at a time, until the job finishes, the budget
//! runs out, or the caller cancels.

pub mod config;
pub mod error;
pub mod policy;
pub mod session;
pub mod source;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::PollConfig;
pub use error::{PollError, QueryError};
pub use policy::Termination;
pub use session::{JobPoller, PollSession};
pub use source::StatusSource;
pub use state::{PollOutcome, PollProgress};
