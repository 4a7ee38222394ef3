//! Core types for Meract.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod geo;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use geo::GeoPoint;
pub use id::*;
pub use status::*;
