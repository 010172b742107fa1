//! Out-of-band error message for C callers
//!
//! Exports report failure with a sentinel (`-1`, `false`, null) and leave
//! the reason here, readable through `psl1ght_get_error`. Each thread has
//! its own message.

use std::cell::RefCell;
use std::ffi::c_char;
use std::fmt::Display;

thread_local! {
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Record `err` as the current error message
pub fn set_error(err: impl Display) {
    let message = err.to_string();
    tracing::debug!("Backend error: {}", message);
    LAST_ERROR.with(|e| *e.borrow_mut() = message);
}

/// The current error message
pub fn last_error() -> String {
    LAST_ERROR.with(|e| e.borrow().clone())
}

/// Forget the current error message
pub fn clear_error() {
    LAST_ERROR.with(|e| e.borrow_mut().clear());
}

/// Helper to write an error message to a C buffer
///
/// The message is truncated to fit and always NUL-terminated.
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
pub unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}
