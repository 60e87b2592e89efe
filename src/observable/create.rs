use std::{marker::PhantomData, sync::Arc};

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::{ForwardObserver, Pass, Sink},
  subscription::{BoxedSubscription, Subscription},
};

/// Creates an observable from a subscribe function.
///
/// `subscribe` runs once per subscription. It receives the downstream
/// observer and returns the subscription that tears down everything it set
/// up. That teardown runs when the downstream unsubscribes or as soon as a
/// terminal event was delivered, whichever comes first. Events pushed after
/// a terminal event or after unsubscribe are dropped.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let emitted = Arc::new(Mutex::new(vec![]));
/// let c_emitted = emitted.clone();
///
/// observable::create(|observer: BoxedObserver<i32, ()>| {
///   observer.next(1);
///   observer.next(2);
///   observer.complete();
///   observer.next(3);
///   BoxedSubscription::empty()
/// })
/// .subscribe(move |v| c_emitted.lock().unwrap().push(v))
/// .unwrap();
///
/// assert_eq!(*emitted.lock().unwrap(), vec![1, 2]);
/// ```
pub fn create<F, U, Item, Err>(subscribe: F) -> Create<F, Item, Err>
where
  F: Fn(BoxedObserver<Item, Err>) -> U,
  U: Subscription + 'static,
{
  Create { subscribe, _hint: PhantomData }
}

pub struct Create<F, Item, Err> {
  subscribe: F,
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { subscribe: self.subscribe.clone(), _hint: PhantomData } }
}

impl<F, U, Item, Err> Observable for Create<F, Item, Err>
where
  F: Fn(BoxedObserver<Item, Err>) -> U,
  U: Subscription + 'static,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    let sink = Arc::new(Sink::new(observer));
    let guarded: BoxedObserver<Item, Err> = Arc::new(ForwardObserver::new(sink.clone(), Pass));
    let teardown = (self.subscribe)(guarded);
    sink.set_upstream(BoxedSubscription::new(teardown));
    Ok(BoxedSubscription::from_arc(sink))
  }
}
