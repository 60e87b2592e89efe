//! The `Observable` contract and the constructors that produce observables.
//!
//! [`Observable::actual_subscribe`] is the single primitive: it attaches a
//! shared observer and returns the only handle able to detach it. Everything
//! else, the closure-based `subscribe*` helpers and every operator, lives on
//! [`ObservableExt`], which is implemented for all observables.

use std::sync::Arc;

use crate::{
  error::{Result, RxError},
  observer::{ignore_complete, ignore_err, BoxedObserver, FnObserver, Observer},
  ops::{
    combine_latest::{CombineLatestOp, Fallible, Plain},
    filter::{FilterOp, TryFilterOp},
    map::{MapOp, TryMapOp},
    skip::{SkipFirstOp, SkipOp},
    switch_map::SwitchMapOp,
    take::TakeOp,
  },
  subscription::BoxedSubscription,
};

mod boxed;
mod create;
mod from_event;
mod of;
mod trivial;

pub use boxed::BoxedObservable;
pub use create::{create, Create};
pub use from_event::{from_event, EventHandler, FromEvent};
pub use of::{of, single_value, Of, SingleValue};
pub use trivial::{empty, never, throw, Empty, Never, Throw};

pub trait Observable {
  type Item;
  type Err;

  /// Attaches `observer`. The returned subscription detaches it.
  ///
  /// Fails when a resource the pipeline depends on was disposed, e.g. a
  /// subject at its root.
  fn actual_subscribe(
    &self,
    observer: BoxedObserver<Self::Item, Self::Err>,
  ) -> Result<BoxedSubscription>;
}

pub trait ObservableExt: Observable + Sized {
  /// Subscribes with a value callback; errors and completion are ignored.
  fn subscribe<N>(&self, next: N) -> Result<BoxedSubscription>
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    let observer = FnObserver::new(next, ignore_err::<Self::Err>, ignore_complete);
    self.actual_subscribe(Arc::new(observer))
  }

  fn subscribe_err<N, E>(&self, next: N, error: E) -> Result<BoxedSubscription>
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    self.actual_subscribe(Arc::new(FnObserver::new(next, error, ignore_complete)))
  }

  fn subscribe_complete<N, C>(&self, next: N, complete: C) -> Result<BoxedSubscription>
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    let observer = FnObserver::new(next, ignore_err::<Self::Err>, complete);
    self.actual_subscribe(Arc::new(observer))
  }

  fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Result<BoxedSubscription>
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
    Self::Item: 'static,
    Self::Err: 'static,
  {
    self.actual_subscribe(Arc::new(FnObserver::new(next, error, complete)))
  }

  fn subscribe_with<O>(&self, observer: O) -> Result<BoxedSubscription>
  where
    O: Observer<Self::Item, Self::Err> + 'static,
  {
    self.actual_subscribe(Arc::new(observer))
  }

  /// Transforms every value with `f`.
  fn map<B, F>(self, f: F) -> MapOp<Self, F>
  where
    F: Fn(Self::Item) -> B + Send + Sync + 'static,
  {
    MapOp::new(self, f)
  }

  /// Like [`map`](ObservableExt::map), but `f` may fail. The first `Err`
  /// is forwarded as the stream error and the upstream is released.
  fn try_map<B, F>(self, f: F) -> TryMapOp<Self, F>
  where
    F: Fn(Self::Item) -> std::result::Result<B, Self::Err> + Send + Sync + 'static,
  {
    TryMapOp::new(self, f)
  }

  /// Forwards only the values for which `predicate` holds.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    FilterOp::new(self, predicate)
  }

  /// Like [`filter`](ObservableExt::filter), but `predicate` may fail.
  fn try_filter<F>(self, predicate: F) -> TryFilterOp<Self, F>
  where
    F: Fn(&Self::Item) -> std::result::Result<bool, Self::Err> + Send + Sync + 'static,
  {
    TryFilterOp::new(self, predicate)
  }

  /// Maps every value to an inner observable and forwards the events of the
  /// most recent one only.
  fn switch_map<Inner, F>(self, f: F) -> SwitchMapOp<Self, F>
  where
    Inner: Observable<Err = Self::Err>,
    F: Fn(Self::Item) -> Inner + Send + Sync + 'static,
  {
    SwitchMapOp::new(self, f)
  }

  /// Emits `f(latest_self, latest_other)` whenever either source emits, as
  /// soon as both have produced at least one value.
  fn combine_latest<B, F, Out>(self, other: B, f: F) -> CombineLatestOp<Self, B, Plain<F>, Out>
  where
    B: Observable<Err = Self::Err>,
    F: Fn(&Self::Item, &B::Item) -> Out + Send + Sync + 'static,
  {
    CombineLatestOp::new(self, other, Plain(f))
  }

  /// Like [`combine_latest`](ObservableExt::combine_latest), but `f` may
  /// fail; the failure terminates the stream.
  fn try_combine_latest<B, F, Out>(
    self,
    other: B,
    f: F,
  ) -> CombineLatestOp<Self, B, Fallible<F>, Out>
  where
    B: Observable<Err = Self::Err>,
    F: Fn(&Self::Item, &B::Item) -> std::result::Result<Out, Self::Err> + Send + Sync + 'static,
  {
    CombineLatestOp::new(self, other, Fallible(f))
  }

  /// Forwards only the `count`-th value (1-based) and drops everything
  /// else, including every later value.
  ///
  /// The counter keeps decrementing past zero, so only the `count`-th
  /// value passes. Use
  /// [`skip_first`](ObservableExt::skip_first) for the conventional
  /// "drop the first `count` values" behavior.
  ///
  /// # Errors
  ///
  /// `count == 0` is rejected with [`RxError::InvalidArgument`].
  fn skip(self, count: usize) -> Result<SkipOp<Self>> {
    if count == 0 {
      return Err(RxError::invalid_argument("count", "must be greater than zero"));
    }
    Ok(SkipOp::new(self, count))
  }

  /// Drops the first `count` values and forwards every value after them.
  fn skip_first(self, count: usize) -> SkipFirstOp<Self> { SkipFirstOp::new(self, count) }

  /// Forwards at most `count` values, completing right after the last one.
  /// `take(0)` completes without ever subscribing to the source.
  fn take(self, count: usize) -> TakeOp<Self> { TakeOp::new(self, count) }

  /// Erases the concrete operator type.
  fn box_it(self) -> BoxedObservable<Self::Item, Self::Err>
  where
    Self: Send + Sync + 'static,
  {
    BoxedObservable::new(self)
  }
}

impl<T: Observable> ObservableExt for T {}
