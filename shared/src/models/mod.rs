//! Data models
//!
//! Shared between the engine and any boundary layer built on it.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod account;
pub mod expense;
pub mod menu;
pub mod order;
pub mod role;
pub mod shift;
pub mod store_info;

// Re-exports
pub use account::*;
pub use expense::*;
pub use menu::*;
pub use order::*;
pub use role::*;
pub use shift::*;
pub use store_info::*;

/// Serde helper for patch fields where absent, null and value must all be
/// distinguished: absent stays `None`, `null` becomes `Some(None)`, a value
/// becomes `Some(Some(v))`. Use with `#[serde(default, with = ...)]`.
pub mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            None => serializer.serialize_none(),
            Some(inner) => inner.serialize(serializer),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::deserialize(deserializer).map(Some)
    }
}
