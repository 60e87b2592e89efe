//! Operators.
//!
//! Every operator is a cold value object: subscribing builds a fresh
//! [`Sink`](crate::sink::Sink) scoped to that one subscription, which lives
//! until the downstream unsubscribes or a terminal event went through.
//! Construct them through [`ObservableExt`](crate::observable::ObservableExt).

pub mod combine_latest;
pub mod filter;
pub mod map;
pub mod skip;
pub mod switch_map;
pub mod take;
