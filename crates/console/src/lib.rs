//! LiftMosque Console core library.
//!
//! The role-scoped realtime heart of the LiftMosque administration console:
//! session lifecycle, scope resolution, live collection views, validated CRUD
//! commands, and the isolated admin-provisioning workflow. The presentation
//! layer (whatever renders lists and captures form input) is an external
//! collaborator that talks to [`Console`] and never to the backends directly.
//!
//! # Architecture
//!
//! - [`store`] - `DocumentStore` seam to the remote realtime document database,
//!   plus a full in-memory implementation
//! - [`auth`] - `IdentityProvider` seam to the credential backend, including
//!   isolated secondary contexts for provisioning
//! - [`session`] - current identity/profile published through a watch channel
//! - [`scope`] - the pure profile -> visibility-predicate resolver
//! - [`live`] - standing subscriptions delivering complete, ordered, scoped
//!   snapshots
//! - [`commands`] - validated create/update/delete and the report response
//! - [`provision`] - mosque-admin account creation in an isolated auth context

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod live;
pub mod models;
pub mod provision;
pub mod scope;
pub mod session;
pub mod store;
pub mod telemetry;

pub use config::{ConsoleConfig, MissingProfilePolicy};
pub use console::Console;
pub use error::{ConsoleError, ValidationError};
pub use live::{DashboardCounts, LiveDirectory, LiveList, LiveView};
pub use scope::ScopePredicate;
pub use session::SessionState;
