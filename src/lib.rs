//! # rxcore: a minimal reactive-stream engine
//!
//! A multicast [`Subject`] plus a small set of composable operators, safe
//! under concurrent subscribe, unsubscribe and emit. Every subscriber sees a
//! well-formed sequence: zero or more values, then at most one completion or
//! error.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxcore::prelude::*;
//!
//! let source = Subject::<&str, ()>::new();
//! let lengths = Arc::new(Mutex::new(vec![]));
//! let c_lengths = lengths.clone();
//!
//! let subscription = source
//!   .clone()
//!   .map(|s| s.len())
//!   .filter(|n| *n > 1)
//!   .take(2)
//!   .subscribe(move |n| c_lengths.lock().unwrap().push(n))
//!   .unwrap();
//!
//! for word in ["a", "bb", "ccc", "dddd"] {
//!   source.next(word).unwrap();
//! }
//! assert_eq!(*lengths.lock().unwrap(), vec![2, 3]);
//! assert!(subscription.is_closed());
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Anything that can be subscribed to |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subject`] | Hot multicast source, both observer and observable |
//! | [`Subscription`] | Handle to cancel an active subscription |
//!
//! ## Feature Flags
//!
//! - **`tracing`** (default): emit lifecycle events through the `tracing`
//!   crate.
//!
//! [`Subject`]: subject::Subject
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription

mod logging;

pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod sink;
pub mod subject;
pub mod subscription;

#[cfg(test)]
mod test_util;

// Re-export the prelude module
pub use prelude::*;
