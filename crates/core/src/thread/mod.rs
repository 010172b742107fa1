//! Thread backend
//!
//! Thin wrapper over the native PPU thread primitives. Every thread is
//! created joinable with a fixed stack size and a fixed lv2 priority; the
//! host's priority levels are mapped to native values when a thread changes
//! its own priority.
//!
//! # Example
//!
//! ```ignore
//! use psl1ght_core::thread::ThreadAdapter;
//! use psl1ght_native::Platform;
//!
//! let threads = ThreadAdapter::new(Platform::native().threads);
//! let handle = threads.create_thread(|| println!("hello from a PPU thread"))?;
//! threads.wait_thread(handle);
//! ```

mod signals;

use std::sync::Arc;

use psl1ght_native::NativeThreads;
use psl1ght_sdk::consts::{
    PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_NORMAL, PRIORITY_TIME_CRITICAL,
    THREAD_DEFAULT_PRIORITY, THREAD_NAME, THREAD_STACK_SIZE,
};
use psl1ght_sdk::{ThreadId, ThreadPriority};

use crate::error::{BackendError, BackendResult};

pub use signals::mask_async_signals;
#[cfg(unix)]
pub use signals::{async_signal_set, ASYNC_SIGNALS};

/// A created thread that has not been joined or detached yet
///
/// Consumed by [`ThreadAdapter::wait_thread`] or
/// [`ThreadAdapter::detach_thread`].
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a thread handle must be waited on or detached"]
pub struct ThreadHandle {
    id: ThreadId,
}

impl ThreadHandle {
    /// Wrap a native id handed in by the host
    ///
    /// The id is not validated; using one that does not name a joinable
    /// thread inherits the native layer's behavior.
    pub fn from_raw(id: ThreadId) -> Self {
        Self { id }
    }

    /// Native thread id
    pub fn id(&self) -> ThreadId {
        self.id
    }
}

/// Map a host priority level to the native value
pub fn native_priority(priority: ThreadPriority) -> i32 {
    match priority {
        ThreadPriority::Low => PRIORITY_LOW,
        ThreadPriority::High => PRIORITY_HIGH,
        ThreadPriority::TimeCritical => PRIORITY_TIME_CRITICAL,
        ThreadPriority::Normal => PRIORITY_NORMAL,
    }
}

/// Thread operations of the backend
#[derive(Clone)]
pub struct ThreadAdapter {
    native: Arc<dyn NativeThreads>,
}

impl ThreadAdapter {
    pub fn new(native: Arc<dyn NativeThreads>) -> Self {
        Self { native }
    }

    /// Create a joinable thread running `entry`
    ///
    /// # Errors
    /// [`BackendError::ResourceExhausted`] if the native layer refuses the
    /// thread.
    pub fn create_thread<F>(&self, entry: F) -> BackendResult<ThreadHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self
            .native
            .spawn(
                Box::new(entry),
                THREAD_DEFAULT_PRIORITY,
                THREAD_STACK_SIZE,
                THREAD_NAME,
            )
            .map_err(|e| {
                tracing::warn!("Thread creation failed: {}", e);
                BackendError::ResourceExhausted
            })?;

        tracing::trace!("Created thread {:#x}", id);
        Ok(ThreadHandle { id })
    }

    /// Block until the thread exits; its exit value is discarded
    pub fn wait_thread(&self, handle: ThreadHandle) {
        let _ = self.native.join(handle.id);
    }

    /// Release join ownership without blocking
    pub fn detach_thread(&self, handle: ThreadHandle) {
        self.native.detach(handle.id);
    }

    /// Id of the calling thread, comparable for equality only
    pub fn current_thread_id(&self) -> ThreadId {
        self.native.current_id()
    }

    /// Apply `priority` to the calling thread
    pub fn set_thread_priority(&self, priority: ThreadPriority) -> BackendResult<()> {
        let value = native_priority(priority);
        let id = self.native.current_id();
        self.native.set_priority(id, value)?;
        tracing::trace!("Thread {:#x} priority {:?} -> {}", id, priority, value);
        Ok(())
    }

    /// Per-thread setup run by the host on the new thread before its entry
    ///
    /// Asynchronous signals are meant to be masked here, which lv2 does not
    /// support yet; see [`mask_async_signals`].
    pub fn setup_thread(&self, name: &str) {
        tracing::trace!("Setting up thread '{}'", name);
        mask_async_signals();
    }
}

impl std::fmt::Debug for ThreadAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeThreads;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn adapter() -> (Arc<FakeThreads>, ThreadAdapter) {
        let fake = Arc::new(FakeThreads::default());
        let adapter = ThreadAdapter::new(fake.clone());
        (fake, adapter)
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(native_priority(ThreadPriority::Low), 19);
        assert_eq!(native_priority(ThreadPriority::Normal), 0);
        assert_eq!(native_priority(ThreadPriority::High), -10);
        assert_eq!(native_priority(ThreadPriority::TimeCritical), -20);
        assert_eq!(native_priority(ThreadPriority::from_raw(99)), 0);
    }

    #[test]
    fn test_set_priority_applies_to_calling_thread() {
        let (fake, threads) = adapter();
        let me = threads.current_thread_id();

        for (level, expected) in [
            (ThreadPriority::Low, 19),
            (ThreadPriority::High, -10),
            (ThreadPriority::TimeCritical, -20),
            (ThreadPriority::Normal, 0),
        ] {
            threads.set_thread_priority(level).unwrap();
            assert_eq!(fake.last_priority(), Some((me, expected)));
        }
    }

    #[test]
    fn test_set_priority_reports_native_failure() {
        let (fake, threads) = adapter();
        fake.fail_priority(true);
        assert!(matches!(
            threads.set_thread_priority(ThreadPriority::High),
            Err(BackendError::Native(_))
        ));
    }

    #[test]
    fn test_create_uses_fixed_parameters() {
        let (fake, threads) = adapter();
        let handle = threads.create_thread(|| {}).unwrap();

        let spawn = fake.last_spawn().unwrap();
        assert_eq!(spawn.priority, 1500);
        assert_eq!(spawn.stack_size, 0x4000);
        assert_eq!(spawn.name, "SDL");
        threads.wait_thread(handle);
    }

    #[test]
    fn test_create_failure_is_resource_exhausted() {
        let (fake, threads) = adapter();
        fake.fail_spawn(true);
        assert_eq!(
            threads.create_thread(|| {}).unwrap_err(),
            BackendError::ResourceExhausted
        );
        assert_eq!(
            BackendError::ResourceExhausted.to_string(),
            "Not enough resources to create thread"
        );
    }

    #[test]
    fn test_wait_runs_entry_and_joins() {
        let (fake, threads) = adapter();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let handle = threads
            .create_thread(move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        let id = handle.id();
        threads.wait_thread(handle);

        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(fake.joined(), vec![id]);
    }

    #[test]
    fn test_detach_does_not_join() {
        let (fake, threads) = adapter();
        let handle = threads.create_thread(|| {}).unwrap();
        let id = handle.id();
        threads.detach_thread(handle);

        assert_eq!(fake.detached(), vec![id]);
        assert!(fake.joined().is_empty());
    }

    #[test]
    fn test_handle_round_trips_raw_id() {
        let handle = ThreadHandle::from_raw(0x1234);
        assert_eq!(handle.id(), 0x1234);
    }

    #[test]
    fn test_hosted_threads_end_to_end() {
        let threads = ThreadAdapter::new(psl1ght_native::Platform::hosted().threads);
        let main_id = threads.current_thread_id();
        let (tx, rx) = std::sync::mpsc::channel();
        let inner = threads.clone();

        let handle = threads
            .create_thread(move || {
                inner.setup_thread("worker");
                tx.send(inner.current_thread_id()).unwrap();
            })
            .unwrap();
        let worker_id = handle.id();
        threads.wait_thread(handle);

        assert_eq!(rx.recv().unwrap(), worker_id);
        assert_ne!(worker_id, main_id);
    }
}
