use parking_lot::Mutex;
use smallvec::SmallVec;

use super::{BoxedSubscription, Subscription};
use crate::logging::debug;

/// Owns a dynamic set of child subscriptions and disposes all of them
/// exactly once.
///
/// - `add` after the composite was unsubscribed disposes the child at once.
/// - `remove` detaches a child without disposing it.
/// - Children are disposed outside the internal lock, so a child's teardown
///   may call back into the composite.
///
/// ```rust
/// use rxcore::prelude::*;
///
/// let composite = CompositeSubscription::default();
/// let child = BoxedSubscription::from_fn(|| {});
/// composite.add(child.clone());
/// composite.unsubscribe();
/// assert!(child.is_closed());
///
/// let late = BoxedSubscription::from_fn(|| {});
/// composite.add(late.clone());
/// assert!(late.is_closed());
/// ```
#[derive(Default)]
pub struct CompositeSubscription(Mutex<Inner>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[BoxedSubscription; 2]>,
}

impl CompositeSubscription {
  pub fn with_capacity(capacity: usize) -> Self {
    CompositeSubscription(Mutex::new(Inner {
      closed: false,
      teardown: SmallVec::with_capacity(capacity),
    }))
  }

  /// Holds `subscription` until the composite is disposed. A composite that
  /// was already disposed unsubscribes it immediately.
  pub fn add(&self, subscription: BoxedSubscription) {
    let mut inner = self.0.lock();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
    } else {
      inner.teardown.push(subscription);
    }
  }

  /// Detaches `subscription` without disposing it. Returns `false` if it was
  /// not held.
  pub fn remove(&self, subscription: &BoxedSubscription) -> bool {
    let mut inner = self.0.lock();
    match inner.teardown.iter().position(|s| s.is_same(subscription)) {
      Some(idx) => {
        inner.teardown.remove(idx);
        true
      }
      None => false,
    }
  }

  /// Number of children currently held.
  pub fn len(&self) -> usize { self.0.lock().teardown.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Subscription for CompositeSubscription {
  fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.lock();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    debug!("composite subscription disposed, releasing {} children", teardown.len());
    for subscription in teardown {
      subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().closed }
}
