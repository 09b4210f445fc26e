// ── Core error types ──
//
// Request-fatal failures of the control and listing paths. Per-address
// block/unblock failures are not errors at this level: the executor
// records them in `ControlOutcome::failed` and moves on.

use thiserror::Error;

use crate::inventory::CacheError;

/// Unified error type for the core crate.
///
/// Display strings include the endpoint and username where relevant but
/// never the password; the controller's own diagnostic is carried in
/// `Login::message`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session lifecycle ────────────────────────────────────────────
    #[error("Cannot initialize controller session at {endpoint}")]
    SessionInit {
        endpoint: String,
        #[source]
        source: unigate_api::Error,
    },

    #[error("Controller login failed for '{username}' at {endpoint}: {message}")]
    Login {
        endpoint: String,
        username: String,
        message: String,
        #[source]
        source: unigate_api::Error,
    },

    // ── Directory ────────────────────────────────────────────────────
    #[error("Cannot fetch device names from controller")]
    Lookup(#[source] unigate_api::Error),

    // ── Inventory cache ──────────────────────────────────────────────
    #[error("Cannot read client inventory: {0}")]
    Cache(#[from] CacheError),
}

impl CoreError {
    /// Short machine-friendly tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionInit { .. } => "session_init",
            Self::Login { .. } => "login",
            Self::Lookup(_) => "lookup",
            Self::Cache(_) => "cache",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_display_omits_source_detail() {
        let err = CoreError::Login {
            endpoint: "https://192.168.1.1/".into(),
            username: "admin".into(),
            message: "invalid credentials".into(),
            source: unigate_api::Error::Authentication {
                message: "invalid credentials".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Controller login failed for 'admin' at https://192.168.1.1/: invalid credentials"
        );
        assert_eq!(err.kind(), "login");
    }

    #[test]
    fn cache_error_converts() {
        let err: CoreError = CacheError::MissingKey {
            bucket: "unifi".into(),
            key: "active".into(),
        }
        .into();
        assert_eq!(err.kind(), "cache");
    }
}
