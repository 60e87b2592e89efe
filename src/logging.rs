// Logging shim: forwards to `tracing` when the feature is enabled. Without it
// the arguments are still type-checked through `format_args!`, so call sites
// need no `cfg` of their own and log-only bindings stay used. Messages are
// therefore written format-style.

#[cfg(feature = "tracing")]
macro_rules! trace {
  ($($arg:tt)*) => { tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
  ($($arg:tt)*) => {{
    let _ = format_args!($($arg)*);
  }};
}

#[cfg(feature = "tracing")]
macro_rules! debug {
  ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
  ($($arg:tt)*) => {{
    let _ = format_args!($($arg)*);
  }};
}

// Not named `warn`: that would clash with the built-in `#[warn]` attribute.
#[cfg(feature = "tracing")]
macro_rules! warn_event {
  ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_event {
  ($($arg:tt)*) => {{
    let _ = format_args!($($arg)*);
  }};
}

pub(crate) use {debug, trace, warn_event};
