//! Fixed values handed to the PSL1GHT SDK
//!
//! The target is fixed hardware, so none of these are queried at runtime.

/// Stack size for every thread created by the backend (16 KiB)
pub const THREAD_STACK_SIZE: usize = 0x4000;

/// lv2 priority given to new threads (0 = highest, 3071 = lowest)
pub const THREAD_DEFAULT_PRIORITY: u64 = 1500;

/// Name given to every thread created by the backend
pub const THREAD_NAME: &str = "SDL";

/// Size of the IO region shared between the PPU and the RSX (1 MiB)
pub const RSX_IO_SIZE: usize = 1024 * 1024;

/// Alignment of the shared IO region, must be a 1 MiB boundary
pub const RSX_IO_ALIGN: usize = 1024 * 1024;

/// Size of the RSX command buffer carved out of the IO region
pub const RSX_COMMAND_BUFFER_SIZE: usize = 0x10000;

/// Performance counter frequency of the millisecond fallback counter
pub const PERFORMANCE_FREQUENCY: u64 = 1000;

/// Native nice-style priority values, indexed by [`crate::ThreadPriority`]
pub const PRIORITY_LOW: i32 = 19;
pub const PRIORITY_NORMAL: i32 = 0;
pub const PRIORITY_HIGH: i32 = -10;
pub const PRIORITY_TIME_CRITICAL: i32 = -20;

/// Video driver name reported by the bootstrap record
pub const VIDEO_DRIVER_NAME: &str = "psl1ght";

/// Human-readable video driver description
pub const VIDEO_DRIVER_DESC: &str = "SDL psl1ght video driver";
