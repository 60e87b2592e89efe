//! `combine_latest` for two sources and `combine_latest_all` for any number
//! of sources sharing one item type.
//!
//! Both keep the latest value of every source and emit once each source has
//! produced at least one value. The stream completes when every source
//! completed, or as soon as one completes without ever emitting, since no
//! combination can be formed after that. Any source error is forwarded and
//! disposes all sources.
//!
//! Storing a value, combining and forwarding happen under one emission gate
//! per subscription, so concurrent sources reach the downstream one at a
//! time and the last emission always reflects the latest values. The gate is
//! reentrant: a downstream observer may push into a source on the same
//! thread. The latest values themselves are cloned out of their lock before
//! the combining closure runs.

use std::{marker::PhantomData, sync::Arc};

use parking_lot::{Mutex, ReentrantMutex};

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::{Forward, ForwardObserver, Sink},
  subscription::{BoxedSubscription, CompositeSubscription, Subscription},
};

/// How two latest values become one output value.
pub trait Combiner<A, B, Out, Err>: Send + Sync {
  fn combine(&self, a: &A, b: &B) -> std::result::Result<Out, Err>;
}

/// Infallible combining closure.
pub struct Plain<F>(pub F);

impl<A, B, Out, Err, F> Combiner<A, B, Out, Err> for Plain<F>
where
  F: Fn(&A, &B) -> Out + Send + Sync,
{
  #[inline]
  fn combine(&self, a: &A, b: &B) -> std::result::Result<Out, Err> { Ok((self.0)(a, b)) }
}

/// Combining closure that may fail; the failure terminates the stream.
pub struct Fallible<F>(pub F);

impl<A, B, Out, Err, F> Combiner<A, B, Out, Err> for Fallible<F>
where
  F: Fn(&A, &B) -> std::result::Result<Out, Err> + Send + Sync,
{
  #[inline]
  fn combine(&self, a: &A, b: &B) -> std::result::Result<Out, Err> { (self.0)(a, b) }
}

/// Built by [`ObservableExt::combine_latest`](crate::observable::ObservableExt::combine_latest)
/// and [`ObservableExt::try_combine_latest`](crate::observable::ObservableExt::try_combine_latest).
pub struct CombineLatestOp<A, B, C, Out> {
  a: A,
  b: B,
  combiner: Arc<C>,
  _hint: PhantomData<fn() -> Out>,
}

impl<A, B, C, Out> CombineLatestOp<A, B, C, Out> {
  pub(crate) fn new(a: A, b: B, combiner: C) -> Self {
    CombineLatestOp { a, b, combiner: Arc::new(combiner), _hint: PhantomData }
  }
}

impl<A: Clone, B: Clone, C, Out> Clone for CombineLatestOp<A, B, C, Out> {
  fn clone(&self) -> Self {
    CombineLatestOp {
      a: self.a.clone(),
      b: self.b.clone(),
      combiner: self.combiner.clone(),
      _hint: PhantomData,
    }
  }
}

impl<A, B, C, Out> Observable for CombineLatestOp<A, B, C, Out>
where
  A: Observable,
  B: Observable<Err = A::Err>,
  A::Item: Clone + Send + 'static,
  B::Item: Clone + Send + 'static,
  A::Err: 'static,
  C: Combiner<A::Item, B::Item, Out, A::Err> + 'static,
  Out: 'static,
{
  type Item = Out;
  type Err = A::Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Out, A::Err>) -> Result<BoxedSubscription> {
    let sink = Arc::new(Sink::new(observer));
    let upstream = Arc::new(CompositeSubscription::with_capacity(2));
    sink.set_upstream(BoxedSubscription::from_arc(upstream.clone()));

    let shared = Arc::new(Shared {
      gate: ReentrantMutex::new(()),
      state: Mutex::new(Pair { a: None, b: None, a_done: false, b_done: false }),
      combiner: self.combiner.clone(),
    });
    let subscribed = self
      .a
      .actual_subscribe(Arc::new(ForwardObserver::new(sink.clone(), Left(shared.clone()))))
      .and_then(|a| {
        upstream.add(a);
        self.b.actual_subscribe(Arc::new(ForwardObserver::new(sink.clone(), Right(shared))))
      });
    match subscribed {
      Ok(b) => upstream.add(b),
      Err(e) => {
        sink.unsubscribe();
        return Err(e);
      }
    }
    Ok(BoxedSubscription::from_arc(sink))
  }
}

struct Pair<A, B> {
  a: Option<A>,
  b: Option<B>,
  a_done: bool,
  b_done: bool,
}

impl<A: Clone, B: Clone> Pair<A, B> {
  fn latest(&self) -> Option<(A, B)> {
    match (&self.a, &self.b) {
      (Some(a), Some(b)) => Some((a.clone(), b.clone())),
      _ => None,
    }
  }
}

struct Shared<A, B, C> {
  gate: ReentrantMutex<()>,
  state: Mutex<Pair<A, B>>,
  combiner: Arc<C>,
}

impl<A: Clone, B: Clone, C> Shared<A, B, C> {
  /// Records a value through `store`, then emits the combination if both
  /// sides have one.
  fn store<Out, Err>(&self, sink: &Arc<Sink<Out, Err>>, store: impl FnOnce(&mut Pair<A, B>))
  where
    C: Combiner<A, B, Out, Err>,
  {
    let _gate = self.gate.lock();
    let latest = {
      let mut pair = self.state.lock();
      store(&mut *pair);
      pair.latest()
    };
    if let Some((a, b)) = latest {
      match self.combiner.combine(&a, &b) {
        Ok(v) => sink.forward_next(v),
        Err(e) => sink.forward_error(e),
      }
    }
  }

  /// Marks one side completed; `mark` reports whether the stream is over.
  fn finish<Out, Err>(
    &self,
    sink: &Arc<Sink<Out, Err>>,
    mark: impl FnOnce(&mut Pair<A, B>) -> bool,
  ) {
    let _gate = self.gate.lock();
    let done = mark(&mut *self.state.lock());
    if done {
      sink.forward_completed();
    }
  }

  fn fail<Out, Err>(&self, err: Err, sink: &Arc<Sink<Out, Err>>) {
    let _gate = self.gate.lock();
    sink.forward_error(err);
  }
}

struct Left<A, B, C>(Arc<Shared<A, B, C>>);

struct Right<A, B, C>(Arc<Shared<A, B, C>>);

impl<A, B, C, Out, Err> Forward<A, Out, Err> for Left<A, B, C>
where
  A: Clone + Send,
  B: Clone + Send,
  C: Combiner<A, B, Out, Err>,
{
  fn next(&self, value: A, sink: &Arc<Sink<Out, Err>>) {
    self.0.store(sink, |pair| pair.a = Some(value));
  }

  fn error(&self, err: Err, sink: &Arc<Sink<Out, Err>>) { self.0.fail(err, sink) }

  fn complete(&self, sink: &Arc<Sink<Out, Err>>) {
    self.0.finish(sink, |pair| {
      pair.a_done = true;
      pair.b_done || pair.a.is_none()
    });
  }
}

impl<A, B, C, Out, Err> Forward<B, Out, Err> for Right<A, B, C>
where
  A: Clone + Send,
  B: Clone + Send,
  C: Combiner<A, B, Out, Err>,
{
  fn next(&self, value: B, sink: &Arc<Sink<Out, Err>>) {
    self.0.store(sink, |pair| pair.b = Some(value));
  }

  fn error(&self, err: Err, sink: &Arc<Sink<Out, Err>>) { self.0.fail(err, sink) }

  fn complete(&self, sink: &Arc<Sink<Out, Err>>) {
    self.0.finish(sink, |pair| {
      pair.b_done = true;
      pair.a_done || pair.b.is_none()
    });
  }
}

/// Combines the latest values of every source into a `Vec`, in source
/// order.
///
/// An empty list of sources completes immediately.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let sources: Vec<Subject<i32, ()>> = (0..3).map(|_| Subject::new()).collect();
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// combine_latest_all(sources.clone())
///   .subscribe(move |v| c_seen.lock().unwrap().push(v))
///   .unwrap();
///
/// sources[0].next(1).unwrap();
/// sources[1].next(2).unwrap();
/// sources[2].next(3).unwrap();
/// sources[0].next(4).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2, 3], vec![4, 2, 3]]);
/// ```
pub fn combine_latest_all<I, S>(sources: I) -> CombineLatestAll<S>
where
  I: IntoIterator<Item = S>,
  S: Observable,
{
  CombineLatestAll { sources: sources.into_iter().collect() }
}

#[derive(Clone)]
pub struct CombineLatestAll<S> {
  sources: Vec<S>,
}

impl<S> Observable for CombineLatestAll<S>
where
  S: Observable,
  S::Item: Clone + Send + 'static,
  S::Err: 'static,
{
  type Item = Vec<S::Item>;
  type Err = S::Err;

  fn actual_subscribe(
    &self,
    observer: BoxedObserver<Vec<S::Item>, S::Err>,
  ) -> Result<BoxedSubscription> {
    let len = self.sources.len();
    if len == 0 {
      observer.complete();
      return Ok(BoxedSubscription::empty());
    }

    let sink = Arc::new(Sink::new(observer));
    let upstream = Arc::new(CompositeSubscription::with_capacity(len));
    sink.set_upstream(BoxedSubscription::from_arc(upstream.clone()));

    let shared = Arc::new(AllShared {
      gate: ReentrantMutex::new(()),
      state: Mutex::new(Latest {
        values: (0..len).map(|_| None).collect(),
        done: vec![false; len],
        missing: len,
        open: len,
      }),
    });
    for (index, source) in self.sources.iter().enumerate() {
      let slot = Slot { index, shared: shared.clone() };
      match source.actual_subscribe(Arc::new(ForwardObserver::new(sink.clone(), slot))) {
        Ok(subscription) => upstream.add(subscription),
        Err(e) => {
          sink.unsubscribe();
          return Err(e);
        }
      }
    }
    Ok(BoxedSubscription::from_arc(sink))
  }
}

struct Latest<Item> {
  values: Vec<Option<Item>>,
  done: Vec<bool>,
  /// Sources that have not produced a value yet.
  missing: usize,
  /// Sources that have not completed yet.
  open: usize,
}

struct AllShared<Item> {
  gate: ReentrantMutex<()>,
  state: Mutex<Latest<Item>>,
}

struct Slot<Item> {
  index: usize,
  shared: Arc<AllShared<Item>>,
}

impl<Item, Err> Forward<Item, Vec<Item>, Err> for Slot<Item>
where
  Item: Clone + Send,
{
  fn next(&self, value: Item, sink: &Arc<Sink<Vec<Item>, Err>>) {
    let _gate = self.shared.gate.lock();
    let combined = {
      let mut state = self.shared.state.lock();
      if state.values[self.index].replace(value).is_none() {
        state.missing -= 1;
      }
      (state.missing == 0).then(|| state.values.iter().flatten().cloned().collect())
    };
    if let Some(combined) = combined {
      sink.forward_next(combined);
    }
  }

  fn error(&self, err: Err, sink: &Arc<Sink<Vec<Item>, Err>>) {
    let _gate = self.shared.gate.lock();
    sink.forward_error(err);
  }

  fn complete(&self, sink: &Arc<Sink<Vec<Item>, Err>>) {
    let _gate = self.shared.gate.lock();
    let done = {
      let mut state = self.shared.state.lock();
      if !std::mem::replace(&mut state.done[self.index], true) {
        state.open -= 1;
      }
      state.open == 0 || state.values[self.index].is_none()
    };
    if done {
      sink.forward_completed();
    }
  }
}
