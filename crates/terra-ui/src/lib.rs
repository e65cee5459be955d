//! # Terra UI kernel
//!
//! Application layer over `terra-atom` and `terra-router`:
//! - [`routes`]: the closed set of routes and the page each one renders
//! - [`state`]: shared UI state atoms (auth, notifications, workspace selection)
//! - [`bootstrap`]: constructs and wires everything from a [`Config`]
//! - [`config`]: `terra.toml` parsing

pub mod bootstrap;
pub mod config;
pub mod routes;
pub mod state;

pub use bootstrap::App;
pub use config::Config;
pub use routes::{register_routes, AppRoute, AppRouter, Page};
pub use state::{AppState, AuthStatus, Notification, NotificationLevel, WorkspaceRef};
