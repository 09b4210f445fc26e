//! Control logic between the HTTP surface and the UniFi controller.
//!
//! - **[`session`]**: Opens one authenticated controller session per
//!   control request. The typestate chain [`Connector`] →
//!   [`PendingSession`] → [`ControllerSession`] makes it impossible to
//!   issue a block/unblock before both initialization and login succeeded.
//!
//! - **[`directory`]**: Fetches the live name → MAC address mapping
//!   ([`NameIndex`]) from an authenticated session. Never cached.
//!
//! - **[`executor`]**: Applies an [`Action`] to each address in order and
//!   partitions the results into a [`ControlOutcome`]. One failed address
//!   never stops the others.
//!
//! - **[`inventory`]**: Reads the client inventory snapshot another
//!   process publishes into a NATS key/value bucket. Never talks to the
//!   controller.

pub mod directory;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod model;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use inventory::{CacheBridge, CacheError, InventoryReader, NatsKvBridge};
pub use model::{
    Action, ActionResult, BlockResult, Client, ControlOutcome, MacAddress, NameIndex,
    UnblockResult,
};
pub use session::{
    Connector, ControllerSession, LegacyConnector, LegacySession, LoginFailure, PendingSession,
    SessionOf, SessionParams,
};
