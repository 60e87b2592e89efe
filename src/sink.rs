//! Forwarding sink shared by every operator.
//!
//! A [`Sink`] owns one downstream observer and the subscription to its
//! upstream. Operators plug their per-value logic in through the
//! [`Forward`] trait and receive events through a [`ForwardObserver`]; the
//! sink enforces that at most one terminal event goes downstream and that
//! the upstream link is released when that happens.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use parking_lot::Mutex;

use crate::{
  error::Result,
  observable::Observable,
  observer::{BoxedObserver, Observer},
  subscription::{BoxedSubscription, Subscription},
};

/// One downstream observer plus the upstream link it depends on. Stops after
/// the first terminal event or an unsubscribe, whichever comes first.
pub struct Sink<Item, Err> {
  observer: BoxedObserver<Item, Err>,
  upstream: Mutex<Option<BoxedSubscription>>,
  stopped: AtomicBool,
}

impl<Item, Err> Sink<Item, Err> {
  pub fn new(observer: BoxedObserver<Item, Err>) -> Self {
    Sink { observer, upstream: Mutex::new(None), stopped: AtomicBool::new(false) }
  }

  /// Stores the upstream subscription, or disposes it right away if the
  /// sink already stopped (a synchronous source may terminate before its
  /// subscribe call even returns).
  pub fn set_upstream(&self, upstream: BoxedSubscription) {
    let mut slot = self.upstream.lock();
    if self.stopped.load(Ordering::Acquire) {
      drop(slot);
      upstream.unsubscribe();
    } else if let Some(previous) = slot.replace(upstream) {
      drop(slot);
      previous.unsubscribe();
    }
  }

  #[inline]
  pub fn is_stopped(&self) -> bool { self.stopped.load(Ordering::Acquire) }

  pub fn forward_next(&self, value: Item) {
    if !self.is_stopped() {
      self.observer.next(value);
    }
  }

  pub fn forward_error(&self, err: Err) {
    if self.stop() {
      self.observer.error(err);
    }
  }

  pub fn forward_completed(&self) {
    if self.stop() {
      self.observer.complete();
    }
  }

  /// Flips the one-shot flag and releases the upstream. Only the first
  /// caller gets `true`.
  fn stop(&self) -> bool {
    if self.stopped.swap(true, Ordering::AcqRel) {
      return false;
    }
    self.dispose_upstream();
    true
  }

  fn dispose_upstream(&self) {
    let upstream = self.upstream.lock().take();
    if let Some(upstream) = upstream {
      upstream.unsubscribe();
    }
  }
}

impl<Item, Err> Subscription for Sink<Item, Err> {
  fn unsubscribe(&self) {
    self.stopped.store(true, Ordering::Release);
    self.dispose_upstream();
  }

  fn is_closed(&self) -> bool { self.is_stopped() }
}

/// Per-operator behavior plugged into a [`Sink`].
///
/// `In` is what the upstream delivers, `Out` what the sink forwards. The
/// terminal methods default to plain forwarding.
pub trait Forward<In, Out, Err>: Send + Sync {
  fn next(&self, value: In, sink: &Arc<Sink<Out, Err>>);

  fn error(&self, err: Err, sink: &Arc<Sink<Out, Err>>) { sink.forward_error(err) }

  fn complete(&self, sink: &Arc<Sink<Out, Err>>) { sink.forward_completed() }
}

/// Forwards values unchanged.
pub struct Pass;

impl<Item, Err> Forward<Item, Item, Err> for Pass {
  #[inline]
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) { sink.forward_next(value) }
}

/// The observer an operator hands to its upstream.
pub struct ForwardObserver<B, Out, Err> {
  sink: Arc<Sink<Out, Err>>,
  behavior: B,
}

impl<B, Out, Err> ForwardObserver<B, Out, Err> {
  pub fn new(sink: Arc<Sink<Out, Err>>, behavior: B) -> Self { ForwardObserver { sink, behavior } }
}

impl<B, In, Out, Err> Observer<In, Err> for ForwardObserver<B, Out, Err>
where
  B: Forward<In, Out, Err>,
{
  fn next(&self, value: In) {
    if !self.sink.is_stopped() {
      self.behavior.next(value, &self.sink);
    }
  }

  fn error(&self, err: Err) {
    if !self.sink.is_stopped() {
      self.behavior.error(err, &self.sink);
    }
  }

  fn complete(&self) {
    if !self.sink.is_stopped() {
      self.behavior.complete(&self.sink);
    }
  }
}

/// Subscribes `source` through a fresh sink driven by `behavior` and returns
/// the sink as the downstream's subscription.
pub(crate) fn subscribe_forward<S, B, Out>(
  source: &S,
  observer: BoxedObserver<Out, S::Err>,
  behavior: B,
) -> Result<BoxedSubscription>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  Out: 'static,
  B: Forward<S::Item, Out, S::Err> + 'static,
{
  let sink = Arc::new(Sink::new(observer));
  let upstream = source.actual_subscribe(Arc::new(ForwardObserver::new(sink.clone(), behavior)))?;
  sink.set_upstream(upstream);
  Ok(BoxedSubscription::from_arc(sink))
}
