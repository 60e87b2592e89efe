use parking_lot::Mutex;

use super::{BoxedSubscription, Subscription};

/// Holds at most one child subscription.
///
/// Assigning a new child disposes the previous one; once the serial
/// subscription itself is unsubscribed, any newly assigned child is disposed
/// immediately.
#[derive(Default)]
pub struct SerialSubscription(Mutex<SerialState>);

#[derive(Default)]
struct SerialState {
  closed: bool,
  current: Option<BoxedSubscription>,
}

impl SerialSubscription {
  pub fn set(&self, subscription: BoxedSubscription) {
    let previous = {
      let mut state = self.0.lock();
      if state.closed {
        Some(subscription)
      } else {
        state.current.replace(subscription)
      }
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
  }

  /// Disposes the current child, if any, and keeps the slot open.
  pub fn clear(&self) {
    let previous = self.0.lock().current.take();
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
  }
}

impl Subscription for SerialSubscription {
  fn unsubscribe(&self) {
    let current = {
      let mut state = self.0.lock();
      state.closed = true;
      state.current.take()
    };
    if let Some(current) = current {
      current.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().closed }
}
