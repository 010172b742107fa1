//! Records exchanged with the host multimedia library
//!
//! These mirror the host's C definitions and are passed across the
//! `psl1ght_backend` export layer unchanged.

/// Abstract thread priority levels defined by the host
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    TimeCritical = 3,
}

impl ThreadPriority {
    /// Convert a raw host value, treating unknown values as `Normal`
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => Self::Low,
            2 => Self::High,
            3 => Self::TimeCritical,
            _ => Self::Normal,
        }
    }
}

/// Packed 32-bit ARGB pixel format (`SDL_PIXELFORMAT_ARGB8888`)
pub const PIXELFORMAT_ARGB8888: u32 = 0x1636_2004;

/// A display mode as understood by the host
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    /// Pixel format (`PIXELFORMAT_*`)
    pub format: u32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
    /// Refresh rate in Hz, 0 if unspecified
    pub refresh_rate: i32,
}

impl DisplayMode {
    /// Create an ARGB8888 mode with the given resolution and refresh rate
    pub const fn argb8888(w: i32, h: i32, refresh_rate: i32) -> Self {
        Self {
            format: PIXELFORMAT_ARGB8888,
            w,
            h,
            refresh_rate,
        }
    }
}

/// Window state passed in by the host for driver callbacks
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostWindow {
    /// Host-assigned window id
    pub id: u32,
    /// Host window flags (`SDL_WINDOW_*` bits)
    pub flags: u32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}
