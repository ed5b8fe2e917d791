//! tradepost-core – Gemeinsame Typen
//!
//! Dieses Crate stellt die Newtype-IDs und Rollen-Tags bereit, die von
//! allen anderen Tradepost-Crates geteilt werden.

pub mod types;

pub use types::{ConnectionId, Rolle, UserId};
