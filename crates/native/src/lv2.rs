//! lv2 native layer linking the PSL1GHT C SDK
//!
//! Declarations follow `sys/thread.h`, `sys/time.h`, `rsx/rsx.h` and
//! `rsx/gcm_sys.h` from PSL1GHT.

use std::ffi::{c_char, c_int, c_void, CString};
use std::sync::Arc;

use psl1ght_sdk::{FlipMode, GcmContextData, ThreadId, TimeVal, THREAD_JOINABLE};

use crate::error::NativeError;
use crate::memory::{CommandBuffer, IoRegion};
use crate::platform::{NativeClock, NativeGpu, NativeThreads, ThreadEntry};

#[link(name = "rsx")]
#[link(name = "gcm_sys")]
#[link(name = "lv2")]
extern "C" {
    fn sysThreadCreate(
        threadid: *mut ThreadId,
        entry: unsafe extern "C" fn(*mut c_void),
        arg: *mut c_void,
        priority: i32,
        stacksize: u64,
        flags: u64,
        threadname: *const c_char,
    ) -> i32;
    fn sysThreadJoin(threadid: ThreadId, retval: *mut u64) -> i32;
    fn sysThreadDetach(threadid: ThreadId) -> i32;
    fn sysThreadGetId(threadid: *mut ThreadId) -> i32;
    fn sysThreadSetPriority(threadid: ThreadId, priority: i32) -> i32;
    fn sysThreadExit(retval: u64) -> !;

    fn gettimeofday(tv: *mut TimeVal, tz: *mut c_void) -> c_int;
    fn usleep(usec: u32) -> c_int;

    fn rsxInit(
        context: *mut *mut GcmContextData,
        cmd_size: u32,
        io_size: u32,
        io_address: *const c_void,
    ) -> i32;
    fn gcmSetFlipMode(mode: u32);
}

/// Trampoline handed to `sysThreadCreate`
///
/// # Safety
/// `arg` must come from `Box::into_raw` on a `Box<ThreadEntry>`.
unsafe extern "C" fn run_thread(arg: *mut c_void) {
    let entry: ThreadEntry = *Box::from_raw(arg as *mut ThreadEntry);
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(entry)).is_err() {
        tracing::error!("Thread entry panicked");
    }
    sysThreadExit(0);
}

/// `sysThread*` primitives
#[derive(Debug, Default, Clone, Copy)]
pub struct Lv2Threads;

impl NativeThreads for Lv2Threads {
    fn spawn(
        &self,
        entry: ThreadEntry,
        priority: u64,
        stack_size: usize,
        name: &str,
    ) -> Result<ThreadId, NativeError> {
        let name = CString::new(name).unwrap_or_default();
        let arg = Box::into_raw(Box::new(entry)) as *mut c_void;
        let mut id: ThreadId = 0;

        // SAFETY: arg is a leaked Box<ThreadEntry> reclaimed by run_thread,
        // or below if creation fails
        let rc = unsafe {
            sysThreadCreate(
                &mut id,
                run_thread,
                arg,
                priority as i32,
                stack_size as u64,
                THREAD_JOINABLE,
                name.as_ptr(),
            )
        };

        if rc != 0 {
            // SAFETY: the thread never started, so the entry is still ours
            drop(unsafe { Box::from_raw(arg as *mut ThreadEntry) });
            return Err(NativeError::status("sysThreadCreate", rc));
        }
        Ok(id)
    }

    fn join(&self, id: ThreadId) -> u64 {
        let mut retval = 0u64;
        // SAFETY: retval is a valid out pointer
        let rc = unsafe { sysThreadJoin(id, &mut retval) };
        if rc != 0 {
            tracing::warn!("sysThreadJoin({:#x}) returned {:#x}", id, rc);
        }
        retval
    }

    fn detach(&self, id: ThreadId) {
        // SAFETY: plain syscall wrapper
        let rc = unsafe { sysThreadDetach(id) };
        if rc != 0 {
            tracing::warn!("sysThreadDetach({:#x}) returned {:#x}", id, rc);
        }
    }

    fn current_id(&self) -> ThreadId {
        let mut id: ThreadId = 0;
        // SAFETY: id is a valid out pointer
        unsafe { sysThreadGetId(&mut id) };
        id
    }

    fn set_priority(&self, id: ThreadId, value: i32) -> Result<(), NativeError> {
        // SAFETY: plain syscall wrapper
        match unsafe { sysThreadSetPriority(id, value) } {
            0 => Ok(()),
            rc => Err(NativeError::status("sysThreadSetPriority", rc)),
        }
    }
}

/// `gettimeofday` / `usleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct Lv2Clock;

impl NativeClock for Lv2Clock {
    fn now(&self) -> TimeVal {
        let mut tv = TimeVal::default();
        // SAFETY: tv is a valid out pointer, timezone may be null
        unsafe { gettimeofday(&mut tv, std::ptr::null_mut()) };
        tv
    }

    fn usleep(&self, usec: u64) {
        // usleep takes 32 bits; longer sleeps are split
        let mut remaining = usec;
        while remaining > 0 {
            let chunk = remaining.min(u64::from(u32::MAX));
            // SAFETY: plain libc call
            unsafe { usleep(chunk as u32) };
            remaining -= chunk;
        }
    }
}

/// `rsxInit` / `gcmSetFlipMode`
#[derive(Debug, Default, Clone, Copy)]
pub struct Lv2Gpu;

impl NativeGpu for Lv2Gpu {
    fn rsx_init(&self, command_size: usize, io: &Arc<IoRegion>) -> Option<CommandBuffer> {
        let mut context: *mut GcmContextData = std::ptr::null_mut();
        // SAFETY: io stays alive as long as the returned CommandBuffer
        let rc = unsafe {
            rsxInit(
                &mut context,
                command_size as u32,
                io.len() as u32,
                io.as_ptr() as *const c_void,
            )
        };
        if rc != 0 {
            tracing::error!("rsxInit returned {:#x}", rc);
            return None;
        }
        CommandBuffer::native(io, command_size, context)
    }

    fn set_flip_mode(&self, mode: FlipMode) {
        // SAFETY: plain SDK call
        unsafe { gcmSetFlipMode(mode as u32) };
    }
}
