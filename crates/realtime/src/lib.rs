//! tradepost-realtime – Connection-Registry und Chat-Gateway
//!
//! Dieses Crate haelt den ephemeren Zustand aller authentifizierten
//! Realtime-Verbindungen und verteilt Praesenz- und Chat-Events an alle
//! Clients. Die Transportschicht (WebSocket im Server-Crate) ruft das
//! [`MessagesGateway`] bei Connect, Disconnect und eingehenden Nachrichten.

pub mod broadcast;
pub mod error;
pub mod events;
pub mod gateway;
pub mod registry;

// Bequeme Re-Exporte
pub use broadcast::EventBroadcaster;
pub use error::{RealtimeError, RealtimeResult};
pub use events::{ChatNachricht, ClientEvent, NeueNachricht, ServerEvent};
pub use gateway::MessagesGateway;
pub use registry::{ConnectionRegistry, VerbundenerClient};
