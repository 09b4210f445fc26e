// Route handlers. Each returns a full response or a `GateError` that the
// router turns into a bare 500.

use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, info};

use unigate_core::session::{self, ControllerSession};
use unigate_core::{
    Action, ActionResult, CacheBridge, Connector, InventoryReader, SessionParams, directory,
    executor,
};

use crate::error::GateError;

/// Serialize `body` as a JSON response.
fn json_response<T: Serialize>(body: &T) -> Result<Response, GateError> {
    let bytes = serde_json::to_vec(body)?;
    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        bytes,
    )
        .into_response())
}

/// `GET /`
pub(crate) fn index() -> Result<Response, GateError> {
    json_response(&serde_json::Map::new())
}

/// `GET /list`: straight from the cache, no controller session.
pub(crate) async fn list<B: CacheBridge>(
    inventory: &InventoryReader<B>,
) -> Result<Response, GateError> {
    let clients = inventory.fetch_inventory().await?;
    json_response(&clients).inspect_err(|e| {
        error!(error = %e, "list: unable to json encode clients");
    })
}

/// `PUT /block/{name}` and `PUT /unblock/{name}`.
///
/// Opens a fresh session, rebuilds the name index, applies `action` to
/// every address under `name`, then logs out.
pub(crate) async fn control<C: Connector>(
    connector: &C,
    params: &SessionParams,
    name: &str,
    action: Action,
) -> Result<Response, GateError> {
    let session = session::open(connector, params).await?;

    let index = match directory::resolve(&session).await {
        Ok(index) => index,
        Err(e) => {
            session.close().await;
            return Err(e.into());
        }
    };

    let outcome = executor::control_by_name(&session, &index, name, action).await;
    session.close().await;

    info!(
        name,
        %action,
        succeeded = outcome.succeeded().len(),
        failed = outcome.failed().len(),
        "{action} request complete"
    );

    json_response(&ActionResult::from(outcome)).inspect_err(|e| {
        error!(error = %e, "{action}: unable to json encode results");
    })
}
