//! Frame hook traits decoupling the scheduler from channel endpoints.

/// Outcome of a consumer-side read swap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapResult {
    /// A snapshot published since the last swap was adopted as the new
    /// read slot.
    Swapped,
    /// No new snapshot was available; the previous read slot is unchanged.
    /// This is a countable diagnostic, not an error. Callers skip
    /// redundant derived work (e.g. GPU re-upload) and continue.
    Stale,
}

impl SwapResult {
    /// Whether a new snapshot was adopted.
    pub fn is_swapped(&self) -> bool {
        matches!(self, Self::Swapped)
    }
}

/// Consumer endpoint of an inbound channel, swapped once per frame.
///
/// Implemented by channel consumers and consumer-side resources so the
/// frame scheduler can drive heterogeneous inbound channels uniformly
/// from `begin_frame`.
pub trait FrameConsumer {
    /// Adopt the latest published snapshot if one exists. Never blocks.
    fn try_swap_read(&mut self) -> SwapResult;
}

/// Producer endpoint of an outbound channel, published once per frame.
///
/// Implemented by channel producers and producer-side resources so the
/// frame scheduler can drive heterogeneous outbound channels uniformly
/// from `end_frame`.
pub trait FramePublisher {
    /// Make the just-written slot the new readable snapshot. Never blocks.
    fn publish(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_result_predicates() {
        assert!(SwapResult::Swapped.is_swapped());
        assert!(!SwapResult::Stale.is_swapped());
    }
}
