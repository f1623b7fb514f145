/// `Ok`/`NoChange` as a dedicated success type rather than an error
/// variant, matching how `add_subscription`/`add_binding`'s idempotent
/// duplicate case is just another successful outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Added(u64),
    NoChange,
}

impl LinkOutcome {
    pub fn is_added(self) -> bool {
        matches!(self, LinkOutcome::Added(_))
    }
}
