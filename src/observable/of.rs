use std::marker::PhantomData;

use crate::{
  error::Result, observable::Observable, observer::BoxedObserver, subscription::BoxedSubscription,
};

/// Creates an observable producing a single value, then completing.
///
/// Every subscriber receives its own clone of `v`, synchronously, inside
/// the subscribe call.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// observable::of::<_, ()>(123)
///   .subscribe(move |v| c_seen.lock().unwrap().push(v))
///   .unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![123]);
/// ```
pub fn of<Item, Err>(v: Item) -> Of<Item, Err> { Of { value: v, _hint: PhantomData } }

pub struct Of<Item, Err> {
  value: Item,
  _hint: PhantomData<fn() -> Err>,
}

impl<Item: Clone, Err> Clone for Of<Item, Err> {
  fn clone(&self) -> Self { Of { value: self.value.clone(), _hint: PhantomData } }
}

impl<Item: Clone, Err> Observable for Of<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    observer.next(self.value.clone());
    observer.complete();
    Ok(BoxedSubscription::empty())
  }
}

/// Creates an observable producing a single value that never completes.
pub fn single_value<Item, Err>(v: Item) -> SingleValue<Item, Err> {
  SingleValue { value: v, _hint: PhantomData }
}

pub struct SingleValue<Item, Err> {
  value: Item,
  _hint: PhantomData<fn() -> Err>,
}

impl<Item: Clone, Err> Clone for SingleValue<Item, Err> {
  fn clone(&self) -> Self { SingleValue { value: self.value.clone(), _hint: PhantomData } }
}

impl<Item: Clone, Err> Observable for SingleValue<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    observer.next(self.value.clone());
    Ok(BoxedSubscription::empty())
  }
}

#[cfg(test)]
mod test {
  use crate::{prelude::*, test_util::*};

  #[test]
  fn of_emits_then_completes() {
    let source = observable::of::<_, ()>("v");
    for _ in 0..2 {
      let recorder = Recorder::new();
      source.subscribe_with(recorder.clone()).unwrap();
      assert_eq!(recorder.events(), vec![Notification::Next("v"), Notification::Complete]);
    }
  }

  #[test]
  fn single_value_never_completes() {
    let recorder = Recorder::new();
    observable::single_value::<_, ()>(7).subscribe_with(recorder.clone()).unwrap();
    assert_eq!(recorder.events(), vec![Notification::Next(7)]);
  }
}
