use std::sync::Arc;

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::{subscribe_forward, Forward, Sink},
  subscription::BoxedSubscription,
};

/// Forwards only the values that satisfy a predicate. Built by
/// [`ObservableExt::filter`](crate::observable::ObservableExt::filter).
pub struct FilterOp<S, F> {
  source: S,
  predicate: Arc<F>,
}

impl<S, F> FilterOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self {
    FilterOp { source, predicate: Arc::new(predicate) }
  }
}

impl<S: Clone, F> Clone for FilterOp<S, F> {
  fn clone(&self) -> Self {
    FilterOp { source: self.source.clone(), predicate: self.predicate.clone() }
  }
}

impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<S::Item, S::Err>,
  ) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, FilterForward(self.predicate.clone()))
  }
}

struct FilterForward<F>(Arc<F>);

impl<F, Item, Err> Forward<Item, Item, Err> for FilterForward<F>
where
  F: Fn(&Item) -> bool + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    if (self.0)(&value) {
      sink.forward_next(value);
    }
  }
}

/// Filter with a fallible predicate. Built by
/// [`ObservableExt::try_filter`](crate::observable::ObservableExt::try_filter).
pub struct TryFilterOp<S, F> {
  source: S,
  predicate: Arc<F>,
}

impl<S, F> TryFilterOp<S, F> {
  pub(crate) fn new(source: S, predicate: F) -> Self {
    TryFilterOp { source, predicate: Arc::new(predicate) }
  }
}

impl<S: Clone, F> Clone for TryFilterOp<S, F> {
  fn clone(&self) -> Self {
    TryFilterOp { source: self.source.clone(), predicate: self.predicate.clone() }
  }
}

impl<S, F> Observable for TryFilterOp<S, F>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  F: Fn(&S::Item) -> std::result::Result<bool, S::Err> + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<S::Item, S::Err>,
  ) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, TryFilterForward(self.predicate.clone()))
  }
}

struct TryFilterForward<F>(Arc<F>);

impl<F, Item, Err> Forward<Item, Item, Err> for TryFilterForward<F>
where
  F: Fn(&Item) -> std::result::Result<bool, Err> + Send + Sync,
{
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    match (self.0)(&value) {
      Ok(true) => sink.forward_next(value),
      Ok(false) => {}
      Err(e) => sink.forward_error(e),
    }
  }
}
