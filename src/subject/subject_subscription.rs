use std::{fmt, sync::Weak};

use parking_lot::Mutex;

use super::SubjectCore;
use crate::{observer::BoxedObserver, subscription::Subscription};

/// Subscription handle for a Subject.
///
/// The handle is shared by the subject's subscriber snapshot and by the
/// caller that subscribed. It refers back to the subject only weakly: a
/// dropped subject does not leak through outstanding handles, and a handle
/// does not keep its subject alive.
///
/// The observer sits in a nullable slot. Unsubscribing, detaching and
/// delivering a terminal event all empty it, which both closes the handle
/// and releases the observer together with everything it captured. An
/// emission that already captured the old snapshot then finds the slot
/// empty and skips this observer.
pub struct SubjectSubscription<Item, Err> {
  subject: Weak<SubjectCore<Item, Err>>,
  observer: Mutex<Option<BoxedObserver<Item, Err>>>,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  pub(crate) fn new(
    subject: Weak<SubjectCore<Item, Err>>,
    observer: BoxedObserver<Item, Err>,
  ) -> Self {
    SubjectSubscription { subject, observer: Mutex::new(Some(observer)) }
  }

  pub(crate) fn deliver_next(&self, value: Item) {
    // Cloned out so the observer runs without the slot locked; it may
    // unsubscribe itself.
    let observer = self.observer.lock().clone();
    if let Some(observer) = observer {
      observer.next(value);
    }
  }

  pub(crate) fn deliver_error(&self, err: Err) {
    if let Some(observer) = self.take_observer() {
      observer.error(err);
    }
  }

  pub(crate) fn deliver_complete(&self) {
    if let Some(observer) = self.take_observer() {
      observer.complete();
    }
  }

  /// Closes the handle and releases the observer without notifying it.
  pub(crate) fn detach(&self) { drop(self.take_observer()); }

  fn take_observer(&self) -> Option<BoxedObserver<Item, Err>> { self.observer.lock().take() }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err>
where
  Item: 'static,
  Err: Send + Sync + 'static,
{
  fn unsubscribe(&self) {
    let Some(observer) = self.take_observer() else { return };
    if let Some(subject) = self.subject.upgrade() {
      subject.remove(self);
    }
    drop(observer);
  }

  fn is_closed(&self) -> bool { self.observer.lock().is_none() }
}

impl<Item, Err> fmt::Debug for SubjectSubscription<Item, Err> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SubjectSubscription")
      .field("closed", &self.observer.lock().is_none())
      .field("subject_alive", &(self.subject.strong_count() > 0))
      .finish()
  }
}
