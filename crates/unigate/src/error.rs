//! Error types for the HTTP layer and the binary.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;

use unigate_config::ConfigError;
use unigate_core::CoreError;

/// A request-fatal failure. Already logged where it was detected.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("cannot encode response: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Callers get a bare 500: no body, no internal detail.
impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Exit codes for the binary.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
}

#[derive(Debug, Error, Diagnostic)]
pub enum StartupError {
    #[error("Invalid configuration: {source}")]
    #[diagnostic(
        code(unigate::config),
        help(
            "Check {path} or the UNIGATE_* environment variables.\n\
             Required: base_url, cache_url, username, password."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Cannot listen on {addr}")]
    #[diagnostic(
        code(unigate::bind),
        help("Is another process using the port? Change `listen` or set UNIGATE_LISTEN.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed")]
    #[diagnostic(code(unigate::serve))]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::Bind { .. } | Self::Serve(_) => exit_code::GENERAL,
        }
    }
}
