//! Subscription handles.
//!
//! A subscription is the only way to detach from an observable. Every handle
//! in this module is idempotent: the first `unsubscribe` releases the
//! resource, later calls do nothing.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

mod composite;
mod serial;

pub use composite::CompositeSubscription;
pub use serial::SerialSubscription;

/// Subscription returned from `Observable::actual_subscribe` to allow
/// unsubscribing.
pub trait Subscription: Send + Sync {
  /// Deregister the stream before it has finished receiving all events.
  /// Calling it more than once is a no-op.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

impl<T> Subscription for Arc<T>
where
  T: Subscription + ?Sized,
{
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Subscription that runs a teardown closure the first time it is
/// unsubscribed.
pub struct ClosureSubscription<F>(Mutex<Option<F>>);

impl<F> ClosureSubscription<F>
where
  F: FnOnce() + Send,
{
  pub fn new(teardown: F) -> Self { ClosureSubscription(Mutex::new(Some(teardown))) }
}

impl<F> Subscription for ClosureSubscription<F>
where
  F: FnOnce() + Send,
{
  fn unsubscribe(&self) {
    // Taken under the lock, invoked outside of it: the teardown may re-enter.
    let teardown = self.0.lock().take();
    if let Some(teardown) = teardown {
      teardown();
    }
  }

  fn is_closed(&self) -> bool { self.0.lock().is_none() }
}

/// The "already disposed" sentinel. Unsubscribing it does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySubscription;

impl Subscription for EmptySubscription {
  #[inline]
  fn unsubscribe(&self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

static EMPTY: Lazy<BoxedSubscription> = Lazy::new(|| BoxedSubscription::new(EmptySubscription));

/// A shared, type-erased subscription.
///
/// Cloning is cheap and every clone controls the same underlying resource,
/// so the handle can be stored in a composite and still be kept by the
/// caller.
///
/// ```rust
/// use std::sync::{
///   atomic::{AtomicUsize, Ordering},
///   Arc,
/// };
///
/// use rxcore::prelude::*;
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let c_calls = calls.clone();
/// let subscription = BoxedSubscription::from_fn(move || {
///   c_calls.fetch_add(1, Ordering::SeqCst);
/// });
///
/// subscription.unsubscribe();
/// subscription.clone().unsubscribe();
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct BoxedSubscription(Arc<dyn Subscription>);

impl BoxedSubscription {
  pub fn new(subscription: impl Subscription + 'static) -> Self {
    BoxedSubscription(Arc::new(subscription))
  }

  /// Wraps an already shared subscription without another allocation.
  pub fn from_arc(subscription: Arc<dyn Subscription>) -> Self { BoxedSubscription(subscription) }

  /// Subscription that invokes `teardown` exactly once, on first unsubscribe.
  pub fn from_fn(teardown: impl FnOnce() + Send + 'static) -> Self {
    Self::new(ClosureSubscription::new(teardown))
  }

  /// The shared no-op subscription.
  pub fn empty() -> Self { EMPTY.clone() }

  /// `true` if both handles control the same resource.
  pub fn is_same(&self, other: &BoxedSubscription) -> bool { Arc::ptr_eq(&self.0, &other.0) }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn unsubscribe(&self) { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl std::fmt::Debug for BoxedSubscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxedSubscription").field("is_closed", &self.is_closed()).finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(T);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
