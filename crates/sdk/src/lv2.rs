//! Native lv2 / PSL1GHT type definitions
//!
//! Opaque handles and small value types used by the PSL1GHT C SDK
//! (`sys/thread.h`, `rsx/rsx.h`, `rsx/gcm_sys.h`, `sys/time.h`).

/// Native PPU thread identifier (`sys_ppu_thread_t`)
///
/// Only meaningful for equality comparison.
pub type ThreadId = u64;

/// Thread creation flag making the thread joinable (`THREAD_JOINABLE`)
pub const THREAD_JOINABLE: u64 = 1;

/// Opaque type for `gcmContextData`
/// The RSX command buffer context returned by `rsxInit`
#[repr(C)]
pub struct GcmContextData {
    _opaque: [u8; 0],
}

/// Buffer flip synchronisation mode (`GCM_FLIP_*`)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    /// Flip on horizontal sync, may tear
    HSync = 1,
    /// Flip on vertical blank
    VSync = 2,
    /// Flip on horizontal sync without breaking the current scanline
    HSyncAndBreakY = 3,
}

/// sysutil notification: the user asked to quit the game
pub const SYSUTIL_EXIT_GAME: u64 = 0x0101;
/// sysutil notification: the system starts drawing over the game
pub const SYSUTIL_DRAW_BEGIN: u64 = 0x0121;
/// sysutil notification: the system stopped drawing over the game
pub const SYSUTIL_DRAW_END: u64 = 0x0122;
/// sysutil notification: the XMB menu was opened
pub const SYSUTIL_MENU_OPEN: u64 = 0x0131;
/// sysutil notification: the XMB menu was closed
pub const SYSUTIL_MENU_CLOSE: u64 = 0x0132;

/// Wall-clock time value, as filled by `gettimeofday`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeVal {
    /// Whole seconds
    pub sec: i64,
    /// Microseconds within the second
    pub usec: i64,
}

impl TimeVal {
    /// Create a time value from whole seconds and microseconds
    pub const fn new(sec: i64, usec: i64) -> Self {
        Self { sec, usec }
    }

    /// Create a time value from a microsecond count
    pub const fn from_micros(micros: i64) -> Self {
        Self {
            sec: micros.div_euclid(1_000_000),
            usec: micros.rem_euclid(1_000_000),
        }
    }

    /// Total microseconds represented by this value
    pub const fn as_micros(&self) -> i64 {
        self.sec * 1_000_000 + self.usec
    }
}
