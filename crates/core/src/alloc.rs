//! Fallible allocation of backend descriptors

use crate::error::{BackendError, BackendResult};

/// Box `value`, reporting allocator exhaustion as [`BackendError::OutOfMemory`]
/// instead of aborting
pub fn try_box<T>(value: T) -> BackendResult<Box<T>> {
    let mut slot = Vec::new();
    slot.try_reserve_exact(1)
        .map_err(|_| BackendError::OutOfMemory)?;
    slot.push(value);
    let raw = Box::into_raw(slot.into_boxed_slice()) as *mut T;
    // SAFETY: a one-element boxed slice has the same layout as a Box<T> and
    // was allocated by the global allocator
    Ok(unsafe { Box::from_raw(raw) })
}
