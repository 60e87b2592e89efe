use std::sync::Arc;

use crate::{
  error::Result, observable::Observable, observer::BoxedObserver, subscription::BoxedSubscription,
};

/// A type-erased, cheaply cloneable observable.
///
/// Useful to hand observables of different concrete types to
/// `combine_latest_all`, or to return different pipelines from one
/// `switch_map` selector.
pub struct BoxedObservable<Item, Err>(Arc<dyn Observable<Item = Item, Err = Err> + Send + Sync>);

impl<Item, Err> BoxedObservable<Item, Err> {
  pub fn new(observable: impl Observable<Item = Item, Err = Err> + Send + Sync + 'static) -> Self {
    BoxedObservable(Arc::new(observable))
  }
}

impl<Item, Err> Clone for BoxedObservable<Item, Err> {
  fn clone(&self) -> Self { BoxedObservable(self.0.clone()) }
}

impl<Item, Err> Observable for BoxedObservable<Item, Err> {
  type Item = Item;
  type Err = Err;

  #[inline]
  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    self.0.actual_subscribe(observer)
  }
}

#[cfg(test)]
mod test {
  use crate::{prelude::*, test_util::*};

  #[test]
  fn mixed_pipelines_share_a_type() {
    let pipelines: Vec<BoxedObservable<i32, ()>> = vec![
      observable::of(1).box_it(),
      observable::of(2).map(|v| v * 10).box_it(),
      observable::empty().box_it(),
    ];

    let recorder = Recorder::new();
    for pipeline in &pipelines {
      pipeline.subscribe_with(recorder.clone()).unwrap();
    }
    assert_eq!(recorder.values(), vec![1, 20]);
  }
}
