//! Core domain types
//!
//! These types describe a Dockerfile generation job as seen from the client
//! side. They are shared between the HTTP client (decoding) and the poller
//! (merging and decision making).

pub mod generation;
pub mod job;
pub mod snapshot;
