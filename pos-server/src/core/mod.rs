//! Core server plumbing: configuration and the per-operation context

pub mod config;
pub mod context;

pub use config::Config;
pub use context::{OpContext, Operator};
