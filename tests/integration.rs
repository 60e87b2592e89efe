//! Integration tests for rxcore
//!
//! Exercises subjects and operator chains through the public API only,
//! including cross-thread subscribe/unsubscribe/emit.

use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  },
  thread,
};

use rxcore::prelude::*;

fn collector<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
  let store = Arc::new(Mutex::new(Vec::new()));
  let c_store = store.clone();
  (store, move |v| c_store.lock().unwrap().push(v))
}

#[test]
fn subject_fan_out_scenario() {
  let s = Subject::<&'static str, ()>::new();
  let (o1, push1) = collector();
  let (o2, push2) = collector();
  let completed = Arc::new(AtomicUsize::new(0));

  let h1 = s.subscribe(push1).unwrap();
  s.next("A").unwrap();
  let c_completed = completed.clone();
  s.subscribe_complete(push2, move || {
    c_completed.fetch_add(1, Ordering::SeqCst);
  })
  .unwrap();
  s.next("B").unwrap();
  h1.unsubscribe();
  s.next("C").unwrap();
  s.complete().unwrap();
  s.next("D").unwrap();

  assert_eq!(*o1.lock().unwrap(), vec!["A", "B"]);
  assert_eq!(*o2.lock().unwrap(), vec!["B", "C"]);
  assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[test]
fn map_filter_take_chain() {
  let (result, push) = collector();
  let source = Subject::<i32, ()>::new();
  let subscription = source
    .clone()
    .map(|x| x * 2)
    .filter(|x| *x > 10)
    .take(3)
    .subscribe(push)
    .unwrap();

  (1..=20).for_each(|v| source.next(v).unwrap());
  assert_eq!(*result.lock().unwrap(), vec![12, 14, 16]);
  assert!(subscription.is_closed());
  assert!(!source.has_observers().unwrap());
}

#[test]
fn select_over_cold_source() {
  let (result, push) = collector();
  let completed = Arc::new(AtomicUsize::new(0));
  let c_completed = completed.clone();

  observable::create(|o: BoxedObserver<&'static str, ()>| {
    o.next("a");
    o.next("bb");
    o.complete();
    BoxedSubscription::empty()
  })
  .map(|s| s.len())
  .subscribe_complete(push, move || {
    c_completed.fetch_add(1, Ordering::SeqCst);
  })
  .unwrap();

  assert_eq!(*result.lock().unwrap(), vec![1, 2]);
  assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[test]
fn from_event_roundtrip() {
  type Handlers = Arc<Mutex<Vec<EventHandler<u32>>>>;
  let handlers: Handlers = Arc::default();
  let removed: Handlers = Arc::default();

  let c_handlers = handlers.clone();
  let c_removed = removed.clone();
  let events = observable::from_event::<_, _, u32, ()>(
    move |h| c_handlers.lock().unwrap().push(h),
    move |h| c_removed.lock().unwrap().push(h),
  );

  let (result, push) = collector();
  let subscription = events.subscribe(push).unwrap();
  let registered = handlers.lock().unwrap()[0].clone();
  registered(1);
  registered(2);
  subscription.unsubscribe();
  subscription.unsubscribe();

  assert_eq!(*result.lock().unwrap(), vec![1, 2]);
  let removed = removed.lock().unwrap();
  assert_eq!(removed.len(), 1);
  assert!(Arc::ptr_eq(&removed[0], &registered));
}

#[test]
fn switch_map_search_box() {
  // Typical "latest request wins" pipeline.
  let queries = Subject::<&'static str, RxError>::new();
  let responses: Vec<Subject<String, RxError>> = (0..2).map(|_| Subject::new()).collect();
  let c_responses = responses.clone();
  let (result, push) = collector();

  queries
    .clone()
    .switch_map(move |q| match q {
      "r" => c_responses[0].clone(),
      _ => c_responses[1].clone(),
    })
    .subscribe(push)
    .unwrap();

  queries.next("r").unwrap();
  queries.next("ru").unwrap();
  responses[0].next("stale".to_string()).unwrap();
  responses[1].next("rust".to_string()).unwrap();
  assert_eq!(*result.lock().unwrap(), vec!["rust".to_string()]);
}

#[test]
fn combine_latest_form_validation() {
  let name = Subject::<String, ()>::new();
  let age = Subject::<u32, ()>::new();
  let (result, push) = collector();

  name
    .clone()
    .combine_latest(age.clone(), |n, a| !n.is_empty() && *a >= 18)
    .subscribe(push)
    .unwrap();

  name.next(String::new()).unwrap();
  age.next(20).unwrap();
  name.next("ada".to_string()).unwrap();
  age.next(12).unwrap();
  assert_eq!(*result.lock().unwrap(), vec![false, true, false]);
}

#[test]
fn skip_variants() {
  let source = Subject::<i32, ()>::new();
  let (nth, push_nth) = collector();
  let (rest, push_rest) = collector();
  source.clone().skip(2).unwrap().subscribe(push_nth).unwrap();
  source.clone().skip_first(2).subscribe(push_rest).unwrap();

  (1..=5).for_each(|v| source.next(v).unwrap());
  assert_eq!(*nth.lock().unwrap(), vec![2]);
  assert_eq!(*rest.lock().unwrap(), vec![3, 4, 5]);
}

#[test]
fn disposed_subject_fails_fast() {
  let subject = Subject::<i32, ()>::new();
  subject.dispose();
  subject.dispose();
  assert_eq!(subject.next(1), Err(RxError::Disposed { resource: "subject" }));
  assert!(subject.clone().map(|v| v + 1).subscribe(|_| {}).is_err());
  assert!(subject.has_observers().is_err());
}

#[test]
fn cross_thread_churn() {
  let subject = Subject::<usize, ()>::new();
  let received = Arc::new(AtomicUsize::new(0));

  thread::scope(|scope| {
    for _ in 0..4 {
      let subject = subject.clone();
      let received = received.clone();
      scope.spawn(move || {
        for _ in 0..200 {
          let received = received.clone();
          let subscription = subject
            .subscribe(move |_| {
              received.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
          subscription.unsubscribe();
        }
      });
    }
    let subject = subject.clone();
    scope.spawn(move || (0..1_000).for_each(|v| subject.next(v).unwrap()));
  });

  assert!(!subject.has_observers().unwrap());
  let before = received.load(Ordering::Relaxed);
  subject.next(usize::MAX).unwrap();
  assert_eq!(received.load(Ordering::Relaxed), before);
}

#[test]
fn boxed_pipelines_share_a_type() {
  let (result, push) = collector();
  let pipelines: Vec<BoxedObservable<i32, ()>> = vec![
    observable::of(1).box_it(),
    observable::of(2).map(|v| v * 10).box_it(),
    observable::empty().box_it(),
  ];
  let push = Arc::new(push);
  for pipeline in pipelines {
    let push = push.clone();
    pipeline.subscribe(move |v| push(v)).unwrap();
  }
  assert_eq!(*result.lock().unwrap(), vec![1, 20]);
}
