use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use crate::{
  error::{Result, RxError},
  observable::Observable,
  observer::BoxedObserver,
  sink::{Forward, ForwardObserver, Sink},
  subscription::{BoxedSubscription, CompositeSubscription, SerialSubscription, Subscription},
};

/// Projects each value to an inner observable and mirrors only the most
/// recent one. Built by
/// [`ObservableExt::switch_map`](crate::observable::ObservableExt::switch_map).
///
/// Every event of the current inner observable goes downstream, including
/// its completion or error. A new outer value disposes the previous inner
/// subscription before the next one is made. Outer terminal events are
/// forwarded directly.
pub struct SwitchMapOp<S, F> {
  source: S,
  func: Arc<F>,
}

impl<S, F> SwitchMapOp<S, F> {
  pub(crate) fn new(source: S, func: F) -> Self { SwitchMapOp { source, func: Arc::new(func) } }
}

impl<S: Clone, F> Clone for SwitchMapOp<S, F> {
  fn clone(&self) -> Self { SwitchMapOp { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, F, Inner> Observable for SwitchMapOp<S, F>
where
  S: Observable,
  S::Item: 'static,
  S::Err: From<RxError> + 'static,
  F: Fn(S::Item) -> Inner + Send + Sync + 'static,
  Inner: Observable<Err = S::Err>,
  Inner::Item: 'static,
{
  type Item = Inner::Item;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<Inner::Item, S::Err>,
  ) -> Result<BoxedSubscription> {
    let sink = Arc::new(Sink::new(observer));
    let inner = Arc::new(SerialSubscription::default());
    let upstream = Arc::new(CompositeSubscription::with_capacity(2));
    upstream.add(BoxedSubscription::from_arc(inner.clone()));
    sink.set_upstream(BoxedSubscription::from_arc(upstream.clone()));

    let behavior =
      SwitchForward { func: self.func.clone(), inner, generation: Arc::new(AtomicUsize::new(0)) };
    match self.source.actual_subscribe(Arc::new(ForwardObserver::new(sink.clone(), behavior))) {
      Ok(outer) => upstream.add(outer),
      Err(e) => {
        sink.unsubscribe();
        return Err(e);
      }
    }
    Ok(BoxedSubscription::from_arc(sink))
  }
}

struct SwitchForward<F> {
  func: Arc<F>,
  inner: Arc<SerialSubscription>,
  generation: Arc<AtomicUsize>,
}

impl<F, Inner, In, Err> Forward<In, Inner::Item, Err> for SwitchForward<F>
where
  F: Fn(In) -> Inner + Send + Sync,
  Inner: Observable<Err = Err>,
  Inner::Item: 'static,
  Err: From<RxError> + 'static,
{
  fn next(&self, value: In, sink: &Arc<Sink<Inner::Item, Err>>) {
    let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
    self.inner.clear();

    let observer = ForwardObserver::new(
      sink.clone(),
      Latest { generation: self.generation.clone(), id },
    );
    match (self.func)(value).actual_subscribe(Arc::new(observer)) {
      // A re-entrant outer value may have superseded this inner while it
      // was subscribing.
      Ok(subscription) if self.generation.load(Ordering::Acquire) == id => {
        self.inner.set(subscription)
      }
      Ok(subscription) => subscription.unsubscribe(),
      Err(e) => sink.forward_error(e.into()),
    }
  }
}

/// Inner-side behavior: drops values from an inner that is no longer the
/// latest one.
struct Latest {
  generation: Arc<AtomicUsize>,
  id: usize,
}

impl Latest {
  #[inline]
  fn is_current(&self) -> bool { self.generation.load(Ordering::Acquire) == self.id }
}

impl<Item, Err> Forward<Item, Item, Err> for Latest {
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    if self.is_current() {
      sink.forward_next(value);
    }
  }

  fn error(&self, err: Err, sink: &Arc<Sink<Item, Err>>) {
    if self.is_current() {
      sink.forward_error(err);
    }
  }

  fn complete(&self, sink: &Arc<Sink<Item, Err>>) {
    if self.is_current() {
      sink.forward_completed();
    }
  }
}
