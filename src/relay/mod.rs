//! Relay integration.
//!
//! Pulls request documents that the web app left on the relay service, and
//! remembers which ones were already processed.

/// HTTP client for the relay
pub mod api;
/// Per-workspace cursor persistence
pub mod cursor;
/// Response types and payload selection
pub mod types;

pub use api::RelayClient;
pub use cursor::CursorStore;
pub use types::{select_payloads, Cursor, RelayPayload, RelayResponse};
