//! Recording observer for unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::observer::{BoxedObserver, Observer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// Observer that records every event it receives, in order. Clones share
/// the same log.
pub struct Recorder<Item, Err>(Arc<Mutex<Vec<Notification<Item, Err>>>>);

impl<Item, Err> Clone for Recorder<Item, Err> {
  fn clone(&self) -> Self { Recorder(self.0.clone()) }
}

impl<Item, Err> Recorder<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  pub fn new() -> Self { Recorder(Arc::new(Mutex::new(Vec::new()))) }

  pub fn boxed(&self) -> BoxedObserver<Item, Err> { Arc::new(self.clone()) }

  pub fn events(&self) -> Vec<Notification<Item, Err>> { self.0.lock().clone() }

  pub fn values(&self) -> Vec<Item> {
    self
      .0
      .lock()
      .iter()
      .filter_map(|n| match n {
        Notification::Next(v) => Some(v.clone()),
        _ => None,
      })
      .collect()
  }
}

impl<Item: Send, Err: Send> Observer<Item, Err> for Recorder<Item, Err> {
  fn next(&self, value: Item) { self.0.lock().push(Notification::Next(value)); }

  fn error(&self, err: Err) { self.0.lock().push(Notification::Error(err)); }

  fn complete(&self) { self.0.lock().push(Notification::Complete); }
}
