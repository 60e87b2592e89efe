use std::{marker::PhantomData, sync::Arc};

use crate::{
  error::Result,
  observable::Observable,
  observer::BoxedObserver,
  sink::Sink,
  subscription::BoxedSubscription,
};

/// Callback registered with an external event source.
pub type EventHandler<Item> = Arc<dyn Fn(Item) + Send + Sync>;

/// Adapts an add/remove handler registration API into an observable.
///
/// Each subscription registers a fresh handler through `add`; every event
/// the source raises on it becomes a value. Unsubscribing passes that very
/// same handler to `remove`, exactly once. The stream never completes on
/// its own.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxcore::prelude::*;
///
/// let handlers: Arc<Mutex<Vec<EventHandler<u32>>>> = Default::default();
/// let (on_add, on_remove) = (handlers.clone(), handlers.clone());
/// let clicks = observable::from_event::<_, _, u32, ()>(
///   move |h| on_add.lock().unwrap().push(h),
///   move |h| on_remove.lock().unwrap().retain(|x| !Arc::ptr_eq(x, &h)),
/// );
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// let subscription = clicks.subscribe(move |v| c_seen.lock().unwrap().push(v)).unwrap();
///
/// let registered = handlers.lock().unwrap().clone();
/// registered.iter().for_each(|h| h(1));
/// subscription.unsubscribe();
/// assert!(handlers.lock().unwrap().is_empty());
/// assert_eq!(*seen.lock().unwrap(), vec![1]);
/// ```
pub fn from_event<A, R, Item, Err>(add: A, remove: R) -> FromEvent<A, R, Item, Err>
where
  A: Fn(EventHandler<Item>),
  R: Fn(EventHandler<Item>) + Send + Sync + 'static,
{
  FromEvent { add, remove: Arc::new(remove), _hint: PhantomData }
}

pub struct FromEvent<A, R, Item, Err> {
  add: A,
  remove: Arc<R>,
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<A, R, Item, Err> Observable for FromEvent<A, R, Item, Err>
where
  A: Fn(EventHandler<Item>),
  R: Fn(EventHandler<Item>) + Send + Sync + 'static,
  Item: 'static,
  Err: 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe(&self, observer: BoxedObserver<Item, Err>) -> Result<BoxedSubscription> {
    let sink = Arc::new(Sink::new(observer));
    let c_sink = sink.clone();
    let handler: EventHandler<Item> = Arc::new(move |v| c_sink.forward_next(v));
    (self.add)(handler.clone());

    let remove = self.remove.clone();
    sink.set_upstream(BoxedSubscription::from_fn(move || remove(handler)));
    Ok(BoxedSubscription::from_arc(sink))
  }
}

#[cfg(test)]
mod test {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use crate::{prelude::*, test_util::*};

  #[derive(Default)]
  struct Button {
    handlers: Mutex<Vec<EventHandler<&'static str>>>,
    removed: Mutex<Vec<EventHandler<&'static str>>>,
  }

  impl Button {
    fn click(&self, label: &'static str) {
      let handlers = self.handlers.lock().clone();
      for handler in handlers {
        handler(label);
      }
    }
  }

  fn clicks(button: &Arc<Button>) -> impl Observable<Item = &'static str, Err = ()> {
    let (on_add, on_remove) = (button.clone(), button.clone());
    observable::from_event(
      move |h| on_add.handlers.lock().push(h),
      move |h: EventHandler<&'static str>| {
        on_remove.handlers.lock().retain(|x| !Arc::ptr_eq(x, &h));
        on_remove.removed.lock().push(h);
      },
    )
  }

  #[test]
  fn one_value_per_trigger() {
    let button = Arc::new(Button::default());
    let recorder = Recorder::new();
    clicks(&button).subscribe_with(recorder.clone()).unwrap();

    button.click("a");
    button.click("b");
    assert_eq!(recorder.events(), vec![Notification::Next("a"), Notification::Next("b")]);
  }

  #[test]
  fn remove_receives_the_added_handler_once() {
    let button = Arc::new(Button::default());
    let subscription = clicks(&button).subscribe(|_| {}).unwrap();
    let added = button.handlers.lock()[0].clone();

    subscription.unsubscribe();
    subscription.unsubscribe();

    let removed = button.removed.lock();
    assert_eq!(removed.len(), 1);
    assert!(Arc::ptr_eq(&removed[0], &added));
    assert!(button.handlers.lock().is_empty());
  }

  #[test]
  fn each_subscription_registers_its_own_handler() {
    let button = Arc::new(Button::default());
    let source = clicks(&button);
    let first = Recorder::new();
    let second = Recorder::new();
    let s1 = source.subscribe_with(first.clone()).unwrap();
    source.subscribe_with(second.clone()).unwrap();
    assert_eq!(button.handlers.lock().len(), 2);

    button.click("x");
    s1.unsubscribe();
    button.click("y");
    assert_eq!(first.values(), vec!["x"]);
    assert_eq!(second.values(), vec!["x", "y"]);
  }
}
