//! Multicast core.
//!
//! [`Subject`] is both an [`Observer`] and an [`Observable`]: values pushed
//! into it are fanned out to every current subscriber.
//!
//! # Concurrency
//!
//! All state lives in a single `SnapshotCell` holding one of three
//! lifecycle states. The subscriber list inside `Active` is never mutated in
//! place: `subscribe`, unsubscribe, the terminal calls and `dispose` each
//! load the current state, build its successor and publish it with a
//! compare-and-swap, retrying on contention. `next` only loads the current
//! snapshot and walks it, so emission never waits on a subscribe or
//! unsubscribe running on another thread, and no lock is held while an
//! observer runs.
//!
//! Re-entrant emission (an observer pushing back into the same subject) is
//! allowed and runs against the snapshot loaded by the inner call. An
//! observer subscribed during an emission does not receive that emission.

use std::sync::Arc;

use crate::{
  error::{Result, RxError},
  logging::{debug, trace, warn_event},
  observable::Observable,
  observer::{BoxedObserver, Observer},
  subscription::BoxedSubscription,
};

mod snapshot;
mod subject_subscription;
mod subscribers;

use snapshot::SnapshotCell;
pub use subject_subscription::SubjectSubscription;
use subscribers::{broadcast_complete, broadcast_error, broadcast_value, without, Subscribers};

/// Lifecycle of a subject. Transitions only move forward:
/// `Active -> Terminated -> Disposed` or `Active -> Disposed`.
enum State<Item, Err> {
  Active(Subscribers<Item, Err>),
  /// Emission has ended; `None` means normal completion.
  Terminated(Option<Err>),
  Disposed,
}

pub(crate) struct SubjectCore<Item, Err> {
  state: SnapshotCell<State<Item, Err>>,
}

impl<Item, Err> SubjectCore<Item, Err>
where
  Item: 'static,
  Err: Send + Sync + 'static,
{
  /// Drops `handle` from the active snapshot. Silently does nothing if it
  /// was already removed or the subject is no longer active.
  pub(crate) fn remove(&self, handle: &SubjectSubscription<Item, Err>) {
    loop {
      let current = self.state.load();
      let State::Active(handles) = &*current else { return };
      let Some(next) = without(handles, handle) else { return };
      let remaining = next.len();
      if self.state.compare_and_swap(&current, Arc::new(State::Active(next))).is_ok() {
        trace!("subject observer removed, {remaining} remaining");
        return;
      }
    }
  }
}

// An observer can own the pipeline that subscribed it, and that pipeline owns
// the handle. Releasing the observers still attached when the last subject
// clone goes away is what frees such pipelines.
impl<Item, Err> Drop for SubjectCore<Item, Err> {
  fn drop(&mut self) {
    if let State::Active(handles) = &*self.state.load() {
      for handle in handles {
        handle.detach();
      }
    }
  }
}

/// Subject: A hot observable that multicasts values to many observers.
///
/// Cloning a subject is cheap; all clones share the same subscribers and
/// lifecycle.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let subject = Subject::<i32, ()>::new();
/// let results = Arc::new(Mutex::new(vec![]));
/// let c_results = results.clone();
///
/// let subscription = subject.subscribe(move |v| c_results.lock().unwrap().push(v)).unwrap();
/// subject.next(1).unwrap();
/// subscription.unsubscribe();
/// subject.next(2).unwrap();
///
/// assert_eq!(*results.lock().unwrap(), vec![1]);
/// ```
///
/// # Errors
///
/// Once [`dispose`](Subject::dispose) ran, every operation except `dispose`
/// itself fails with [`RxError::Disposed`]. Repeating `error`/`complete` on
/// a terminated (but not disposed) subject is a silent no-op.
pub struct Subject<Item, Err> {
  core: Arc<SubjectCore<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Subject { core: Arc::new(SubjectCore { state: SnapshotCell::new(State::Active(Vec::new())) }) }
  }
}

impl<Item, Err> Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + Send + Sync + 'static,
{
  pub fn new() -> Self { Self::default() }

  /// Attaches `observer`.
  ///
  /// On a terminated subject the captured terminal event is delivered to
  /// `observer` right away and a no-op subscription is returned.
  pub fn subscribe_observer(
    &self,
    observer: BoxedObserver<Item, Err>,
  ) -> Result<BoxedSubscription> {
    let handle = Arc::new(SubjectSubscription::new(Arc::downgrade(&self.core), observer.clone()));
    loop {
      let current = self.core.state.load();
      let next = match &*current {
        State::Disposed => return Err(RxError::disposed("subject")),
        State::Terminated(err) => {
          match err {
            Some(err) => observer.error(err.clone()),
            None => observer.complete(),
          }
          return Ok(BoxedSubscription::empty());
        }
        State::Active(handles) => {
          let mut next = Vec::with_capacity(handles.len() + 1);
          next.extend_from_slice(handles);
          next.push(handle.clone());
          next
        }
      };
      if self.core.state.compare_and_swap(&current, Arc::new(State::Active(next))).is_ok() {
        trace!("subject observer added");
        return Ok(BoxedSubscription::from_arc(handle));
      }
    }
  }

  /// Delivers `value` to every subscriber of the current snapshot, in
  /// subscription order. A no-op once terminated.
  pub fn next(&self, value: Item) -> Result<()> {
    let snapshot = self.core.state.load();
    match &*snapshot {
      State::Active(handles) => {
        broadcast_value(handles, value);
        Ok(())
      }
      State::Terminated(_) => Ok(()),
      State::Disposed => Err(RxError::disposed("subject")),
    }
  }

  /// Terminates the subject with `err`, delivering it to every current
  /// subscriber and to every later one.
  pub fn error(&self, err: Err) -> Result<()> {
    if let Some(handles) = self.transition(State::Terminated(Some(err.clone())))? {
      debug!("subject terminated with error, notifying {} observers", handles.len());
      broadcast_error(&handles, err);
    }
    Ok(())
  }

  /// Completes the subject, notifying every current subscriber and every
  /// later one.
  pub fn complete(&self) -> Result<()> {
    if let Some(handles) = self.transition(State::Terminated(None))? {
      debug!("subject completed, notifying {} observers", handles.len());
      broadcast_complete(&handles);
    }
    Ok(())
  }

  /// Permanently tears the subject down. Current subscribers are detached
  /// without a terminal notification. Disposing twice is a no-op.
  pub fn dispose(&self) {
    loop {
      let current = self.core.state.load();
      if matches!(&*current, State::Disposed) {
        return;
      }
      if self.core.state.compare_and_swap(&current, Arc::new(State::Disposed)).is_ok() {
        if let State::Active(handles) = &*current {
          debug!("subject disposed, detaching {} observers", handles.len());
          for handle in handles {
            handle.detach();
          }
        }
        return;
      }
    }
  }

  /// `true` while the subject is active and has at least one subscriber.
  ///
  /// Fails once the subject was disposed.
  pub fn has_observers(&self) -> Result<bool> { Ok(self.observer_count()? > 0) }

  /// Number of attached observers; `0` once the subject terminated.
  ///
  /// Fails once the subject was disposed.
  pub fn observer_count(&self) -> Result<usize> {
    match &*self.core.state.load() {
      State::Active(handles) => Ok(handles.len()),
      State::Terminated(_) => Ok(0),
      State::Disposed => Err(RxError::disposed("subject")),
    }
  }

  /// `true` after [`dispose`](Subject::dispose).
  pub fn is_disposed(&self) -> bool { matches!(&*self.core.state.load(), State::Disposed) }

  /// `true` once the subject completed, errored or was disposed.
  pub fn is_terminated(&self) -> bool {
    !matches!(&*self.core.state.load(), State::Active(_))
  }

  /// Moves an active subject to `target`. Returns the handles that were
  /// subscribed at the moment of the swap, `None` if the subject had already
  /// terminated.
  fn transition(&self, target: State<Item, Err>) -> Result<Option<Subscribers<Item, Err>>> {
    let mut target = Arc::new(target);
    loop {
      let current = self.core.state.load();
      match &*current {
        State::Active(_) => {}
        State::Terminated(_) => return Ok(None),
        State::Disposed => return Err(RxError::disposed("subject")),
      }
      match self.core.state.compare_and_swap(&current, target) {
        Ok(()) => {
          let State::Active(handles) = &*current else { return Ok(None) };
          return Ok(Some(handles.clone()));
        }
        Err(rejected) => target = rejected,
      }
    }
  }
}

impl<Item, Err> Observable for Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + Send + Sync + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    self.subscribe_observer(observer)
  }
}

// The trait methods can not report a disposed subject, so misuse through
// them is logged and dropped. Call the inherent methods to observe it.
impl<Item, Err> Observer<Item, Err> for Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + Send + Sync + 'static,
{
  fn next(&self, value: Item) {
    if let Err(err) = Subject::next(self, value) {
      warn_event!("value pushed into a disposed subject was dropped: {err}");
    }
  }

  fn error(&self, err: Err) {
    if let Err(err) = Subject::error(self, err) {
      warn_event!("error pushed into a disposed subject was dropped: {err}");
    }
  }

  fn complete(&self) {
    if let Err(err) = Subject::complete(self) {
      warn_event!("completion pushed into a disposed subject was dropped: {err}");
    }
  }
}
