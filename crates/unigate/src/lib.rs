//! HTTP surface of unigate.
//!
//! [`Gate`] answers four routes and hands every other request back to the
//! caller as [`Dispatch::NotHandled`], so it can sit in front of any other
//! axum handler chain (see [`Gate::wrap`]).

pub mod error;
mod handlers;
pub mod router;
pub mod server;

pub use error::{GateError, StartupError};
pub use router::{Dispatch, Gate, Route, gate_layer};
