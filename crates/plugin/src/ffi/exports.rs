//! C-compatible exports for the thread and timer backends

use std::ffi::{c_char, c_int, c_void, CStr};

use tracing::instrument;
use tracing_subscriber::EnvFilter;

use psl1ght_core::{thread::ThreadHandle, timer};
use psl1ght_sdk::{ThreadId, ThreadPriority};

use crate::error::{last_error, set_error, write_error};
use crate::globals::{globals, is_backend_initialized};

/// Host thread entry point
pub type ThreadFunction = unsafe extern "C" fn(data: *mut c_void) -> c_int;

/// Host data pointer carried into the new thread
struct ThreadData(*mut c_void);

// SAFETY: The host hands the pointer over to the new thread and does not
// use it concurrently.
unsafe impl Send for ThreadData {}

impl ThreadData {
    fn into_raw(self) -> *mut c_void {
        self.0
    }
}

fn install_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Install logging and create the global backend
///
/// Safe to call more than once. Every other export also creates the
/// backend on first use, so calling this is only needed to get logging.
#[no_mangle]
pub extern "C" fn psl1ght_backend_init() -> bool {
    let already = is_backend_initialized();
    let level = globals().backend().config().log_level();
    install_subscriber(level);

    if already {
        tracing::debug!("PSL1GHT backend already initialized");
    } else {
        tracing::info!("PSL1GHT backend loaded");
    }
    true
}

/// Stop the tick timer and forget the sysutil queue; devices are freed by the host
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn psl1ght_backend_quit() {
    globals().set_sysutil(None);
    globals().backend().shutdown();
}

/// Copy the calling thread's last error message into `buf`
///
/// Returns the full message length, which may exceed what was copied.
///
/// # Safety
/// - `buf` must be a valid pointer to at least `maxlen` bytes, or null
#[no_mangle]
pub unsafe extern "C" fn psl1ght_get_error(buf: *mut c_char, maxlen: usize) -> usize {
    let message = last_error();
    write_error(buf, maxlen, &message);
    message.len()
}

// === Threads ===

/// Create a thread running `entry(data)`
///
/// Writes the new thread's handle to `out_handle` and returns 0, or returns
/// -1 with the error message set.
///
/// # Safety
/// - `entry` must be safe to call with `data` on another thread
/// - `out_handle` must be valid for writes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn psl1ght_create_thread(
    entry: Option<ThreadFunction>,
    data: *mut c_void,
    out_handle: *mut ThreadId,
) -> c_int {
    let Some(entry) = entry else {
        set_error("Thread entry is null");
        return -1;
    };

    let data = ThreadData(data);
    let threads = globals().backend().threads.clone();
    let handle = threads.create_thread(move || {
        // SAFETY: guaranteed by the caller of psl1ght_create_thread
        let _status = unsafe { entry(data.into_raw()) };
    });

    match handle {
        Ok(handle) => {
            // The host owns the thread through its raw id from here on
            let id = handle.id();
            if !out_handle.is_null() {
                *out_handle = id;
            }
            0
        }
        Err(e) => {
            set_error(e);
            -1
        }
    }
}

/// Block until the thread exits
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn psl1ght_wait_thread(handle: ThreadId) {
    let threads = globals().backend().threads.clone();
    threads.wait_thread(ThreadHandle::from_raw(handle));
}

/// Let the thread clean up after itself when it exits
#[no_mangle]
pub extern "C" fn psl1ght_detach_thread(handle: ThreadId) {
    let threads = globals().backend().threads.clone();
    threads.detach_thread(ThreadHandle::from_raw(handle));
}

/// Id of the calling thread
#[no_mangle]
pub extern "C" fn psl1ght_thread_id() -> ThreadId {
    globals().backend().threads.current_thread_id()
}

/// Apply a host priority level (0 low .. 3 time critical) to the calling
/// thread; returns 0 or -1
#[no_mangle]
pub extern "C" fn psl1ght_set_thread_priority(priority: c_int) -> c_int {
    let threads = globals().backend().threads.clone();
    match threads.set_thread_priority(ThreadPriority::from_raw(priority)) {
        Ok(()) => 0,
        Err(e) => {
            set_error(e);
            -1
        }
    }
}

/// Per-thread setup, run on the new thread before the host entry
///
/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn psl1ght_setup_thread(name: *const c_char) {
    let name = if name.is_null() {
        ""
    } else {
        CStr::from_ptr(name).to_str().unwrap_or("")
    };
    globals().backend().threads.clone().setup_thread(name);
}

// === Timer ===

#[no_mangle]
pub extern "C" fn psl1ght_ticks_init() {
    globals().backend().ticks.init();
}

#[no_mangle]
pub extern "C" fn psl1ght_ticks_quit() {
    globals().backend().ticks.quit();
}

/// Milliseconds since the tick origin, wrapping at 32 bits
#[no_mangle]
pub extern "C" fn psl1ght_get_ticks() -> u32 {
    globals().backend().ticks.get_ticks()
}

#[no_mangle]
pub extern "C" fn psl1ght_get_performance_counter() -> u64 {
    globals().backend().ticks.performance_counter()
}

#[no_mangle]
pub extern "C" fn psl1ght_get_performance_frequency() -> u64 {
    globals().backend().ticks.performance_frequency()
}

/// Sleep the calling thread for at least `ms` milliseconds
#[no_mangle]
pub extern "C" fn psl1ght_delay(ms: u32) {
    let clock = globals().platform().clock;
    timer::delay(clock.as_ref(), ms);
}
