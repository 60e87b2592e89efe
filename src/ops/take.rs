use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use crate::{
  error::Result,
  logging::trace,
  observable::Observable,
  observer::BoxedObserver,
  sink::{subscribe_forward, Forward, Sink},
  subscription::BoxedSubscription,
};

/// Emits only the first `count` values emitted by the source, then
/// completes. Built by [`ObservableExt::take`](crate::observable::ObservableExt::take).
#[derive(Clone)]
pub struct TakeOp<S> {
  source: S,
  count: usize,
}

impl<S> TakeOp<S> {
  pub(crate) fn new(source: S, count: usize) -> Self { TakeOp { source, count } }
}

impl<S> Observable for TakeOp<S>
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
    if self.count == 0 {
      trace!("take(0) completes without subscribing upstream");
      observer.complete();
      return Ok(BoxedSubscription::empty());
    }
    subscribe_forward(&self.source, observer, TakeForward(AtomicUsize::new(self.count)))
  }
}

struct TakeForward(AtomicUsize);

impl<Item, Err> Forward<Item, Item, Err> for TakeForward {
  fn next(&self, value: Item, sink: &Arc<Sink<Item, Err>>) {
    match self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1)) {
      Ok(1) => {
        sink.forward_next(value);
        sink.forward_completed();
      }
      Ok(_) => sink.forward_next(value),
      Err(_) => {}
    }
  }
}

#[cfg(test)]
mod test {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  use crate::{prelude::*, test_util::*};

  #[test]
  fn base_function() {
    let source = Subject::<i32, ()>::new();
    let recorder = Recorder::new();
    source.clone().take(2).subscribe_with(recorder.clone()).unwrap();

    (1..=5).for_each(|v| source.next(v).unwrap());
    assert_eq!(
      recorder.events(),
      vec![Notification::Next(1), Notification::Next(2), Notification::Complete]
    );
    // Completing released the subject.
    assert!(!source.has_observers().unwrap());
  }

  #[test]
  fn zero_never_subscribes() {
    let subscribed = Arc::new(AtomicUsize::new(0));
    let c_subscribed = subscribed.clone();
    let source = observable::create(move |o: BoxedObserver<i32, ()>| {
      c_subscribed.fetch_add(1, Ordering::SeqCst);
      o.next(1);
      BoxedSubscription::empty()
    });

    let recorder = Recorder::new();
    let subscription = source.take(0).subscribe_with(recorder.clone()).unwrap();
    assert_eq!(recorder.events(), vec![Notification::Complete]);
    assert_eq!(subscribed.load(Ordering::SeqCst), 0);
    assert!(subscription.is_closed());
  }

  #[test]
  fn early_source_completion() {
    let source = Subject::<i32, ()>::new();
    let recorder = Recorder::new();
    source.clone().take(5).subscribe_with(recorder.clone()).unwrap();
    source.next(1).unwrap();
    source.complete().unwrap();
    assert_eq!(recorder.events(), vec![Notification::Next(1), Notification::Complete]);
  }

  #[test]
  fn synchronous_source_is_disposed() {
    let torn_down = Arc::new(AtomicUsize::new(0));
    let c_torn_down = torn_down.clone();
    let source = observable::create(move |o: BoxedObserver<i32, ()>| {
      (1..=10).for_each(|v| o.next(v));
      o.complete();
      let c_torn_down = c_torn_down.clone();
      BoxedSubscription::from_fn(move || {
        c_torn_down.fetch_add(1, Ordering::SeqCst);
      })
    });

    let recorder = Recorder::new();
    source.take(3).subscribe_with(recorder.clone()).unwrap();
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(torn_down.load(Ordering::SeqCst), 1);
  }
}
