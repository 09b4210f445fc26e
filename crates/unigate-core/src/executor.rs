// ── Bulk control executor ──
//
// Sequential, left-to-right, best effort per address.

use tracing::{debug, warn};

use crate::model::{Action, ControlOutcome, MacAddress, NameIndex};
use crate::session::ControllerSession;

/// Apply `action` to each address in order.
///
/// A rejected address is logged and recorded as failed; processing always
/// continues with the next one. The outcome does not depend on whether an
/// address was already in the requested state: only the controller's reply
/// to this call counts.
pub async fn apply<S: ControllerSession>(
    session: &S,
    addresses: &[MacAddress],
    action: Action,
) -> ControlOutcome {
    let mut outcome = ControlOutcome::new(action);

    for mac in addresses {
        let result = match action {
            Action::Block => session.block(mac).await,
            Action::Unblock => session.unblock(mac).await,
        };

        match result {
            Ok(()) => {
                debug!(%mac, %action, "applied");
                outcome.record(mac.clone(), true);
            }
            Err(e) => {
                warn!(%mac, %action, error = %e, "unable to {action} mac");
                outcome.record(mac.clone(), false);
            }
        }
    }

    outcome
}

/// Apply `action` to every address registered under `name`.
///
/// An unknown name is not an error: the outcome is simply empty.
pub async fn control_by_name<S: ControllerSession>(
    session: &S,
    index: &NameIndex,
    name: &str,
    action: Action,
) -> ControlOutcome {
    let addresses = index.addresses(name);
    if addresses.is_empty() {
        debug!(name, %action, "no addresses registered under name");
    }
    apply(session, addresses, action).await
}
