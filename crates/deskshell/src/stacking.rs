/*!
Stacking controller.

Hands out z-order tokens. Each `Desktop` owns exactly one controller, so
tokens are unique and strictly increasing for the lifetime of that desktop.
A `u64` counter will not wrap within any plausible session, so tokens are
never compacted.
*/

use crate::types::ZOrder;

/// Monotonic z-order counter.
#[derive(Debug, Clone)]
pub(crate) struct StackingController {
  next: u64,
}

impl StackingController {
  pub(crate) const fn new(initial: u64) -> Self {
    Self { next: initial }
  }

  /// Read-and-increment. The returned token is greater than every token
  /// handed out before it.
  pub(crate) fn bump(&mut self) -> ZOrder {
    let z = ZOrder(self.next);
    self.next = self.next.saturating_add(1);
    z
  }

  /// The token the next `bump` will return.
  pub(crate) const fn peek(&self) -> ZOrder {
    ZOrder(self.next)
  }
}
