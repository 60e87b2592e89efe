//! Infrastructure errors.
//!
//! These are returned to the caller that misused the engine (subscribing to a
//! disposed subject, building an operator with an invalid count). They never
//! travel down a stream; stream errors use the pipeline's own `Err` type.

use thiserror::Error;

/// Fail-fast error raised by the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RxError {
  /// The resource was disposed and can not be used any more.
  #[error("cannot access a disposed {resource}")]
  Disposed { resource: &'static str },

  /// An operator was constructed with an argument outside its domain.
  #[error("invalid argument `{name}`: {reason}")]
  InvalidArgument { name: &'static str, reason: &'static str },
}

impl RxError {
  pub(crate) fn disposed(resource: &'static str) -> Self { RxError::Disposed { resource } }

  pub(crate) fn invalid_argument(name: &'static str, reason: &'static str) -> Self {
    RxError::InvalidArgument { name, reason }
  }
}

pub type Result<T, E = RxError> = std::result::Result<T, E>;
