use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::{subscribe_forward, Forward, Sink},
  subscription::BoxedSubscription,
};

/// Forwards only the `count`-th value. Built by
/// [`ObservableExt::skip`](crate::observable::ObservableExt::skip).
#[derive(Clone)]
pub struct SkipOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { SkipOp { source, count } }
}

impl<S> Observable for SkipOp<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<S::Item, S::Err>,
  ) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, NthForward(AtomicUsize::new(self.count)))
  }
}

/// The counter saturates at zero, so exactly one value, the one that brings
/// it from one to zero, is forwarded.
struct NthForward(AtomicUsize);

impl<Item, Err> Forward<Item, Item, Err> for NthForward {
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    let previous = self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1));
    if previous == Ok(1) {
      sink.forward_next(value);
    }
  }
}

/// Drops the first `count` values. Built by
/// [`ObservableExt::skip_first`](crate::observable::ObservableExt::skip_first).
#[derive(Clone)]
pub struct SkipFirstOp<S> {
  source: S,
  count: usize,
}

impl<S> SkipFirstOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { SkipFirstOp { source, count } }
}

impl<S> Observable for SkipFirstOp<S>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<S::Item, S::Err>,
  ) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, SkipFirstForward(AtomicUsize::new(self.count)))
  }
}

struct SkipFirstForward(AtomicUsize);

impl<Item, Err> Forward<Item, Item, Err> for SkipFirstForward {
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    // Once the counter is exhausted every value passes.
    if self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1)).is_err() {
      sink.forward_next(value);
    }
  }
}
