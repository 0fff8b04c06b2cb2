//! Data Transfer Objects for the generation backend
//!
//! Wire shapes of the backend's JSON API. Field names follow the backend's
//! camelCase convention.

pub mod generation;
