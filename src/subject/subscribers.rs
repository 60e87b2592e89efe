use std::sync::Arc;

use super::subject_subscription::SubjectSubscription;

/// One immutable generation of a subject's subscribers, in emission order.
pub(crate) type Subscribers<Item, Err> = Vec<Arc<SubjectSubscription<Item, Err>>>;

/// Broadcast value to all handles with optimal cloning.
///
/// The value is cloned for every handle except the last one, which receives
/// the moved value.
pub(crate) fn broadcast_value<Item: Clone, Err>(
  handles: &[Arc<SubjectSubscription<Item, Err>>],
  value: Item,
) {
  let mut iter = handles.iter().peekable();
  while let Some(handle) = iter.next() {
    if iter.peek().is_some() {
      handle.deliver_next(value.clone());
    } else {
      handle.deliver_next(value);
      break;
    }
  }
}

/// Broadcast error to all handles, cloning for all but the last.
pub(crate) fn broadcast_error<Item, Err: Clone>(
  handles: &[Arc<SubjectSubscription<Item, Err>>],
  err: Err,
) {
  let mut iter = handles.iter().peekable();
  while let Some(handle) = iter.next() {
    if iter.peek().is_some() {
      handle.deliver_error(err.clone());
    } else {
      handle.deliver_error(err);
      break;
    }
  }
}

pub(crate) fn broadcast_complete<Item, Err>(handles: &[Arc<SubjectSubscription<Item, Err>>]) {
  for handle in handles {
    handle.deliver_complete();
  }
}

/// Copy of `handles` without `target`, or `None` if `target` is not in it.
pub(crate) fn without<Item, Err>(
  handles: &[Arc<SubjectSubscription<Item, Err>>],
  target: &SubjectSubscription<Item, Err>,
) -> Option<Subscribers<Item, Err>> {
  let idx = handles.iter().position(|h| std::ptr::eq(Arc::as_ptr(h), target))?;
  let mut next = Vec::with_capacity(handles.len() - 1);
  next.extend_from_slice(&handles[..idx]);
  next.extend_from_slice(&handles[idx + 1..]);
  Some(next)
}
