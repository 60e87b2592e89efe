use std::sync::Arc;

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::{subscribe_forward, Forward, Sink},
  subscription::BoxedSubscription,
};

/// Applies a closure to each value. Built by
/// [`ObservableExt::map`](crate::observable::ObservableExt::map).
pub struct MapOp<S, F> {
  source: S,
  func: Arc<F>,
}

impl<S, F> MapOp<S, F> {
  pub(crate) fn new(source: S, func: F) -> Self { MapOp { source, func: Arc::new(func) } }
}

impl<S: Clone, F> Clone for MapOp<S, F> {
  fn clone(&self) -> Self { MapOp { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, F, B> Observable for MapOp<S, F>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  F: Fn(S::Item) -> B + Send + Sync + 'static,
  B: 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe(&self, observer: BoxedObserver<B, S::Err>) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, MapForward(self.func.clone()))
  }
}

struct MapForward<F>(Arc<F>);

impl<F, In, Out, Err> Forward<In, Out, Err> for MapForward<F>
where
  F: Fn(In) -> Out + Send + Sync,
{
  #[inline]
  fn next(&self, value: In, sink: &Arc<Sink<Out, Err>>) { sink.forward_next((self.0)(value)) }
}

/// Applies a fallible closure to each value. Built by
/// [`ObservableExt::try_map`](crate::observable::ObservableExt::try_map).
pub struct TryMapOp<S, F> {
  source: S,
  func: Arc<F>,
}

impl<S, F> TryMapOp<S, F> {
  pub(crate) fn new(source: S, func: F) -> Self { TryMapOp { source, func: Arc::new(func) } }
}

impl<S: Clone, F> Clone for TryMapOp<S, F> {
  fn clone(&self) -> Self { TryMapOp { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, F, B> Observable for TryMapOp<S, F>
where
  S: Observable,
  S::Item: 'static,
  S::Err: 'static,
  F: Fn(S::Item) -> std::result::Result<B, S::Err> + Send + Sync + 'static,
  B: 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe(&self, observer: BoxedObserver<B, S::Err>) -> Result<BoxedSubscription> {
    subscribe_forward(&self.source, observer, TryMapForward(self.func.clone()))
  }
}

struct TryMapForward<F>(Arc<F>);

impl<F, In, Out, Err> Forward<In, Out, Err> for TryMapForward<F>
where
  F: Fn(In) -> std::result::Result<Out, Err> + Send + Sync,
{
  fn next(&self, value: In, sink: &Arc<Sink<Out, Err>>) {
    match (self.0)(value) {
      Ok(v) => sink.forward_next(v),
      Err(e) => sink.forward_error(e),
    }
  }
}

#[cfg(test)]
mod test {
  use std::sync::Arc;

  use crate::{prelude::*, test_util::*};

  #[test]
  fn string_length() {
    let source = Subject::<&'static str, ()>::new();
    let recorder = Recorder::new();
    source.clone().map(|v| v.len()).subscribe_with(recorder.clone()).unwrap();

    source.next("a").unwrap();
    source.next("bb").unwrap();
    source.complete().unwrap();
    assert_eq!(
      recorder.events(),
      vec![Notification::Next(1), Notification::Next(2), Notification::Complete]
    );
  }

  #[test]
  fn map_types_mixed() {
    let recorder = Recorder::new();
    observable::of::<_, ()>('a')
      .map(|_| 1_i32)
      .map(|v| v as f32 / 2.)
      .subscribe_with(recorder.clone())
      .unwrap();
    assert_eq!(recorder.values(), vec![0.5]);
  }

  #[test]
  fn selector_failure_terminates() {
    let source = Subject::<i32, String>::new();
    let recorder = Recorder::new();
    source
      .clone()
      .try_map(|v| if v < 0 { Err(format!("negative: {v}")) } else { Ok(v * 2) })
      .subscribe_with(recorder.clone())
      .unwrap();

    source.next(1).unwrap();
    source.next(-1).unwrap();
    source.next(2).unwrap();
    assert_eq!(
      recorder.events(),
      vec![Notification::Next(2), Notification::Error("negative: -1".to_string())]
    );
    // The failing stage released its subscription to the subject.
    assert!(!source.has_observers().unwrap());
  }

  #[test]
  fn unsubscribe_releases_source() {
    let source = Subject::<i32, ()>::new();
    let subscription = source.clone().map(|v| v + 1).subscribe(|_| {}).unwrap();
    assert!(source.has_observers().unwrap());
    subscription.unsubscribe();
    assert!(!source.has_observers().unwrap());
  }

  #[test]
  fn dropped_pipeline_is_freed() {
    let subject = Subject::<i32, ()>::new();
    let token = Arc::new(());
    let alive = Arc::downgrade(&token);
    let subscription = subject
      .clone()
      .map(|v| v + 1)
      .subscribe(move |_| {
        let _ = &token;
      })
      .unwrap();

    // Neither unsubscribed nor terminated: only dropped.
    drop(subscription);
    assert!(alive.upgrade().is_some());
    drop(subject);
    assert!(alive.upgrade().is_none());
  }

  #[test]
  fn disposed_root_fails_subscribe() {
    let source = Subject::<i32, ()>::new();
    source.dispose();
    let result = source.clone().map(|v| v + 1).subscribe(|_| {});
    assert_eq!(result.unwrap_err(), RxError::Disposed { resource: "subject" });
  }
}
