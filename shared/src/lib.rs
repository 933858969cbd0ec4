//! Shared types for the POS back-office engine
//!
//! Domain models, the unified error system, and small utilities used by
//! both the server crate and any boundary layer built on top of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
