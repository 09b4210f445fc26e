// ── Domain model ──
//
// Value types only: nothing in here talks to the network.

pub mod client;
pub mod mac;
pub mod names;
pub mod outcome;

pub use client::Client;
pub use mac::MacAddress;
pub use names::NameIndex;
pub use outcome::{Action, ActionResult, BlockResult, ControlOutcome, UnblockResult};
