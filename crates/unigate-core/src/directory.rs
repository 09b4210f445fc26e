// ── Name/address directory ──

use tracing::{debug, error, trace};

use crate::error::CoreError;
use crate::model::NameIndex;
use crate::session::ControllerSession;

/// Fetch the current name → address mapping from an authenticated session.
///
/// Rebuilt on every call; there is no degraded mode, so a failed fetch
/// aborts the request.
pub async fn resolve<S: ControllerSession>(session: &S) -> Result<NameIndex, CoreError> {
    match session.list_names().await {
        Ok(index) => {
            debug!(names = index.len(), "resolved device names");
            trace!(names = ?index.names().collect::<Vec<_>>(), "name index");
            Ok(index)
        }
        Err(source) => {
            error!(error = %source, "unable to get names");
            Err(CoreError::Lookup(source))
        }
    }
}
