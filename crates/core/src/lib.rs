//! Meract Core - Shared types library.
//!
//! This crate provides the types shared by the Meract admin components:
//! - `admin` - Session-aware API client, data-access layer and stream viewer
//! - `cli` - Command-line front end for platform administration
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Backend wire
//! formats (`SCREAMING_SNAKE_CASE` statuses, numeric ids) are captured here once
//! so every consumer agrees on them.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, emails, statuses, roles and geographic points

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
