//! PPU thread primitives on top of std threads
//!
//! Ids are assigned from a counter and published to the thread itself
//! through a thread-local, so `current_id` works on every host OS. Threads
//! not created through [`HostedThreads`] get an id on first query.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use dashmap::DashMap;
use psl1ght_sdk::ThreadId;

use crate::error::NativeError;
use crate::platform::{NativeThreads, ThreadEntry};

/// Smallest stack given to a hosted thread
///
/// The std runtime needs more headroom than a PSL1GHT C thread, so the
/// fixed lv2 stack size is raised to this on hosted builds.
pub const HOSTED_MIN_STACK_SIZE: usize = 256 * 1024;

/// Next id handed out to a thread
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT_ID: Cell<ThreadId> = const { Cell::new(0) };
}

fn next_id() -> ThreadId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Std-backed thread table
#[derive(Default)]
pub struct HostedThreads {
    /// Join handles of threads that are neither joined nor detached
    handles: DashMap<ThreadId, JoinHandle<()>>,
}

impl HostedThreads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads still owned by the table
    pub fn joinable_count(&self) -> usize {
        self.handles.len()
    }
}

impl NativeThreads for HostedThreads {
    fn spawn(
        &self,
        entry: ThreadEntry,
        priority: u64,
        stack_size: usize,
        name: &str,
    ) -> Result<ThreadId, NativeError> {
        let id = next_id();
        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .stack_size(stack_size.max(HOSTED_MIN_STACK_SIZE))
            .spawn(move || {
                CURRENT_ID.with(|c| c.set(id));
                entry();
            })
            .map_err(|e| {
                tracing::warn!("Thread spawn failed: {}", e);
                NativeError::status("sysThreadCreate", e.raw_os_error().unwrap_or(-1))
            })?;

        tracing::trace!(
            "Spawned thread '{}' id={} priority={} (priority ignored on host)",
            name,
            id,
            priority
        );
        self.handles.insert(id, handle);
        Ok(id)
    }

    fn join(&self, id: ThreadId) -> u64 {
        let Some((_, handle)) = self.handles.remove(&id) else {
            tracing::warn!("Join on unknown or detached thread {}", id);
            return 0;
        };
        match handle.join() {
            Ok(()) => 0,
            Err(_) => {
                tracing::error!("Thread {} panicked", id);
                1
            }
        }
    }

    fn detach(&self, id: ThreadId) {
        // Dropping a JoinHandle detaches the thread
        if self.handles.remove(&id).is_none() {
            tracing::warn!("Detach on unknown or joined thread {}", id);
        }
    }

    fn current_id(&self) -> ThreadId {
        CURRENT_ID.with(|c| {
            if c.get() == 0 {
                c.set(next_id());
            }
            c.get()
        })
    }

    fn set_priority(&self, id: ThreadId, value: i32) -> Result<(), NativeError> {
        if id != self.current_id() {
            return Err(NativeError::Unsupported("setting another thread's priority"));
        }
        set_calling_thread_nice(value)
    }
}

#[cfg(target_os = "linux")]
fn set_calling_thread_nice(value: i32) -> Result<(), NativeError> {
    // SAFETY: gettid has no preconditions
    let tid = unsafe { libc::syscall(libc::SYS_gettid) } as libc::id_t;
    // SAFETY: setpriority only reads its arguments
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, tid, value) };
    if rc == 0 {
        Ok(())
    } else {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
        Err(NativeError::status("setpriority", errno))
    }
}

#[cfg(not(target_os = "linux"))]
fn set_calling_thread_nice(_value: i32) -> Result<(), NativeError> {
    Err(NativeError::Unsupported("per-thread priority"))
}
