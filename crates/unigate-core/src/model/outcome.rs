// ── Bulk control outcome ──

use serde::Serialize;
use strum::Display;

use super::mac::MacAddress;

/// The control primitive applied to every resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Block,
    Unblock,
}

/// Partition of the attempted addresses into those the controller accepted
/// and those it rejected, each in attempt order.
///
/// Every attempted address lands in exactly one of the two sequences; an
/// address that was never attempted appears in neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOutcome {
    action: Action,
    succeeded: Vec<MacAddress>,
    failed: Vec<MacAddress>,
}

impl ControlOutcome {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, mac: MacAddress, ok: bool) {
        if ok {
            self.succeeded.push(mac);
        } else {
            self.failed.push(mac);
        }
    }

    pub fn succeeded(&self) -> &[MacAddress] {
        &self.succeeded
    }

    pub fn failed(&self) -> &[MacAddress] {
        &self.failed
    }

    /// Nothing was attempted (the name resolved to no addresses).
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Response body of `PUT /block/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockResult {
    pub blocked: Vec<MacAddress>,
    pub not_blocked: Vec<MacAddress>,
}

/// Response body of `PUT /unblock/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnblockResult {
    pub unblocked: Vec<MacAddress>,
    pub not_unblocked: Vec<MacAddress>,
}

/// Action-specific wire shape of a [`ControlOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    Block(BlockResult),
    Unblock(UnblockResult),
}

impl From<ControlOutcome> for ActionResult {
    fn from(outcome: ControlOutcome) -> Self {
        match outcome.action {
            Action::Block => Self::Block(BlockResult {
                blocked: outcome.succeeded,
                not_blocked: outcome.failed,
            }),
            Action::Unblock => Self::Unblock(UnblockResult {
                unblocked: outcome.succeeded,
                not_unblocked: outcome.failed,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn action_display() {
        assert_eq!(Action::Block.to_string(), "block");
        assert_eq!(Action::Unblock.to_string(), "unblock");
    }

    #[test]
    fn empty_block_result_serializes_empty_arrays() {
        let result = ActionResult::from(ControlOutcome::new(Action::Block));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "blocked": [], "not_blocked": [] })
        );
    }

    #[test]
    fn unblock_result_keys() {
        let mut outcome = ControlOutcome::new(Action::Unblock);
        outcome.record(MacAddress::new("aa:00:00:00:00:01"), true);
        outcome.record(MacAddress::new("aa:00:00:00:00:02"), false);
        assert_eq!(outcome.attempted(), 2);

        assert_eq!(
            serde_json::to_value(ActionResult::from(outcome)).unwrap(),
            json!({
                "unblocked": ["aa:00:00:00:00:01"],
                "not_unblocked": ["aa:00:00:00:00:02"]
            })
        );
    }
}
