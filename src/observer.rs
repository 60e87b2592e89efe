//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::{marker::PhantomData, sync::Arc};

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. Every method takes `&self`: a subject may deliver to the
/// same observer from whichever thread happens to emit, so an observer that
/// keeps state is responsible for its own synchronization.
///
/// # Contract
///
/// A well-formed sequence is zero or more `next` calls followed by at most
/// one `error` or `complete`. Nothing is delivered after the terminal call.
pub trait Observer<Item, Err>: Send + Sync {
  /// Receive the next value from the observable
  fn next(&self, value: Item);

  /// Handle an error from the observable; no more values follow.
  fn error(&self, err: Err);

  /// Handle completion of the observable; no more values follow.
  fn complete(&self);
}

/// Shared, type-erased observer as it travels through a pipeline.
pub type BoxedObserver<Item, Err> = Arc<dyn Observer<Item, Err>>;

impl<Item, Err, O> Observer<Item, Err> for Arc<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&self) { (**self).complete() }
}

// ============================================================================
// Closure observers
// ============================================================================

/// Observer assembled from up to three closures.
///
/// Built by the `subscribe*` family on
/// [`ObservableExt`](crate::observable::ObservableExt); the unused slots are
/// filled with no-op functions.
pub struct FnObserver<N, E, C, Item, Err> {
  next: N,
  error: E,
  complete: C,
  _hint: PhantomData<fn(Item, Err)>,
}

impl<N, E, C, Item, Err> FnObserver<N, E, C, Item, Err>
where
  N: Fn(Item) + Send + Sync,
  E: Fn(Err) + Send + Sync,
  C: Fn() + Send + Sync,
{
  pub fn new(next: N, error: E, complete: C) -> Self {
    FnObserver { next, error, complete, _hint: PhantomData }
  }
}

impl<N, E, C, Item, Err> Observer<Item, Err> for FnObserver<N, E, C, Item, Err>
where
  N: Fn(Item) + Send + Sync,
  E: Fn(Err) + Send + Sync,
  C: Fn() + Send + Sync,
{
  #[inline]
  fn next(&self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(&self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(&self) { (self.complete)() }
}

pub(crate) fn ignore_err<Err>(_: Err) {}

pub(crate) fn ignore_complete() {}
