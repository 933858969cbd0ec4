//! POS back-office engine
//!
//! Order lifecycle, shift management and a double-entry ledger over a
//! single SQLite database. Operations are free async functions taking the
//! caller's connection/transaction plus an [`core::OpContext`]; the library
//! holds no global state beyond the pool in [`db::DbService`].

pub mod core;
pub mod db;
pub mod ledger;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod settings;
pub mod shifts;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::core::{Config, OpContext, Operator};
pub use db::DbService;
