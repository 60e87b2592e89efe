use std::marker::PhantomData;

use crate::{
  error::Result, observable::Observable, observer::BoxedObserver, subscription::BoxedSubscription,
};

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

pub struct Empty<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item, Err> Observable for Empty<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    observer.complete();
    Ok(BoxedSubscription::empty())
  }
}

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw<Item, Err: Clone>(err: Err) -> Throw<Item, Err> { Throw { err, _hint: PhantomData } }

pub struct Throw<Item, Err> {
  err: Err,
  _hint: PhantomData<fn() -> Item>,
}

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Throw { err: self.err.clone(), _hint: PhantomData } }
}

impl<Item, Err: Clone> Observable for Throw<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    observer.error(self.err.clone());
    Ok(BoxedSubscription::empty())
  }
}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

pub struct Never<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item, Err> Observable for Never<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, _: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    Ok(BoxedSubscription::empty())
  }
}
