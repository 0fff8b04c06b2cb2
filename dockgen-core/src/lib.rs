//! DockGen Core
//!
//! Core types shared by the DockGen client, poller and CLI.
//!
//! This crate contains:
//! - Domain types: Job identifiers, build status, generation records, snapshots
//! - DTOs: Request/response bodies exchanged with the generation backend

pub mod domain;
pub mod dto;
