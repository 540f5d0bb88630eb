//! LiftMosque Core - Shared types library.
//!
//! This crate provides common types used across all LiftMosque console components:
//! - `console` - The admin console core (session, live views, commands)
//! - `integration-tests` - End-to-end tests against the in-memory backends
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and coordinates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
