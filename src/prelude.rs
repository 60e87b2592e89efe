//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Error types
pub use crate::error::{Result, RxError};
// Core traits and constructors, reachable as `observable::of(..)` etc.
pub use crate::observable::{self, BoxedObservable, EventHandler, Observable, ObservableExt};
// Observer
pub use crate::observer::{BoxedObserver, FnObserver, Observer};
// Operators
pub use crate::ops::combine_latest::combine_latest_all;
// Sink
pub use crate::sink::{Forward, ForwardObserver, Sink};
// Subject
pub use crate::subject::*;
// Subscription
pub use crate::subscription::*;
