use thiserror::Error;

/// Top-level error type for the `unigate-api` crate.
///
/// `unigate-core` decides which of these are fatal for a request and which
/// are recorded per address.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session cookie was rejected. `message` is what
    /// the controller sent back.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Legacy API ──────────────────────────────────────────────────
    /// Error from the legacy API (parsed from the `{meta: {rc, msg}}` envelope).
    #[error("Legacy API error: {message}")]
    LegacyApi { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the controller rejected our credentials or session.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// Nothing in the gate retries on its own; the flag is surfaced in logs
    /// so an operator can tell a flaky controller from a misconfigured one.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The controller-supplied diagnostic carried by this error, if any.
    pub fn controller_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message } | Self::LegacyApi { message } => Some(message),
            _ => None,
        }
    }
}
