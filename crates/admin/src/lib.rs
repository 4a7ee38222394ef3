//! Meract Admin library.
//!
//! Client side of the Meract admin console:
//! - [`gateway`] - Session-aware HTTP client with single-shot renewal and replay
//! - [`session`] - Credential and profile storage (durable file + session scope)
//! - [`auth`] - Sign-in, sign-out, the route gate and the role-based menu
//! - [`api`] - Typed endpoints per entity
//! - [`views`] - List view models (fetch, filter, mutate-then-refetch)
//! - [`viewer`] - Live stream viewer: media subscription, chat, route
//!
//! # Security
//!
//! The session file holds an admin bearer token. It is written with owner-only
//! permissions on unix and removed on sign-out or failed renewal.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod viewer;
pub mod views;

pub use api::AdminApi;
pub use config::ConsoleConfig;
pub use error::{ErrorClass, GatewayError};
pub use gateway::GatewayClient;
pub use session::SessionState;
