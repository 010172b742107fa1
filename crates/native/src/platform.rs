//! Native facility traits and the platform bundle

use std::sync::Arc;

use psl1ght_sdk::{FlipMode, ThreadId, TimeVal};

use crate::error::NativeError;
use crate::memory::{CommandBuffer, IoRegion};

/// Work run on a newly created native thread
pub type ThreadEntry = Box<dyn FnOnce() + Send + 'static>;

/// Native thread primitives (`sysThread*`)
pub trait NativeThreads: Send + Sync {
    /// Create a joinable thread running `entry`
    ///
    /// Returns the native id, or the native status on failure.
    fn spawn(
        &self,
        entry: ThreadEntry,
        priority: u64,
        stack_size: usize,
        name: &str,
    ) -> Result<ThreadId, NativeError>;

    /// Block until the thread exits and return its exit value
    fn join(&self, id: ThreadId) -> u64;

    /// Give up join ownership; the runtime reclaims the thread on exit
    fn detach(&self, id: ThreadId);

    /// Id of the calling thread
    fn current_id(&self) -> ThreadId;

    /// Apply a native priority value to a thread
    fn set_priority(&self, id: ThreadId, value: i32) -> Result<(), NativeError>;
}

/// Wall clock and sleep primitives (`gettimeofday`, `usleep`)
pub trait NativeClock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> TimeVal;

    /// Suspend the calling thread for at least `usec` microseconds
    fn usleep(&self, usec: u64);
}

/// RSX bootstrap primitives (`memalign`, `rsxInit`, `gcmSetFlipMode`)
pub trait NativeGpu: Send + Sync {
    /// Allocate the IO region shared with the RSX
    fn alloc_io(&self, size: usize, align: usize) -> Option<Arc<IoRegion>> {
        IoRegion::alloc(size, align).map(Arc::new)
    }

    /// Set up the command buffer and map `io` for the RSX
    fn rsx_init(&self, command_size: usize, io: &Arc<IoRegion>) -> Option<CommandBuffer>;

    /// Select when buffer flips take effect
    fn set_flip_mode(&self, mode: FlipMode);
}

/// One implementation of every native facility
#[derive(Clone)]
pub struct Platform {
    pub threads: Arc<dyn NativeThreads>,
    pub clock: Arc<dyn NativeClock>,
    pub gpu: Arc<dyn NativeGpu>,
}

impl Platform {
    /// Create a platform from explicit implementations
    pub fn new(
        threads: Arc<dyn NativeThreads>,
        clock: Arc<dyn NativeClock>,
        gpu: Arc<dyn NativeGpu>,
    ) -> Self {
        Self {
            threads,
            clock,
            gpu,
        }
    }

    /// Platform backed by std threads, the system clock and a software
    /// command buffer
    pub fn hosted() -> Self {
        Self::new(
            Arc::new(crate::hosted::HostedThreads::new()),
            Arc::new(crate::hosted::HostedClock),
            Arc::new(crate::hosted::HostedGpu::new()),
        )
    }

    /// Platform backed by the PSL1GHT SDK
    #[cfg(feature = "lv2")]
    pub fn lv2() -> Self {
        Self::new(
            Arc::new(crate::lv2::Lv2Threads),
            Arc::new(crate::lv2::Lv2Clock),
            Arc::new(crate::lv2::Lv2Gpu),
        )
    }

    /// Platform matching the build target
    pub fn native() -> Self {
        #[cfg(feature = "lv2")]
        {
            Self::lv2()
        }
        #[cfg(not(feature = "lv2"))]
        {
            Self::hosted()
        }
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
