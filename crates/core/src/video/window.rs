//! Host window objects as seen by video drivers

use std::any::Any;

use bitflags::bitflags;
use psl1ght_sdk::HostWindow;

/// Host-assigned window id
pub type WindowId = u32;

bitflags! {
    /// Host window flags (`SDL_WINDOW_*` bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 0x0000_0001;
        const OPENGL = 0x0000_0002;
        const SHOWN = 0x0000_0004;
        const HIDDEN = 0x0000_0008;
        const BORDERLESS = 0x0000_0010;
        const RESIZABLE = 0x0000_0020;
        const MINIMIZED = 0x0000_0040;
        const MAXIMIZED = 0x0000_0080;
        const INPUT_GRABBED = 0x0000_0100;
        const INPUT_FOCUS = 0x0000_0200;
        const MOUSE_FOCUS = 0x0000_0400;
        const FOREIGN = 0x0000_0800;
    }
}

/// Driver-private state attached to a window
///
/// Trivial on PSL1GHT: there is no native window behind it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WindowData;

/// The host's window object
///
/// Owned by the host; drivers attach their [`WindowData`] to it on creation
/// and it is released together with the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub flags: WindowFlags,
    pub driver_data: Option<Box<WindowData>>,
}

impl Window {
    /// Create a window record with no driver data attached
    pub fn new(id: WindowId, title: impl Into<String>, w: i32, h: i32) -> Self {
        Self {
            id,
            title: title.into(),
            x: 0,
            y: 0,
            w,
            h,
            flags: WindowFlags::empty(),
            driver_data: None,
        }
    }

    /// Whether this window has keyboard focus
    pub fn has_input_focus(&self) -> bool {
        self.flags.contains(WindowFlags::INPUT_FOCUS)
    }

    /// Copy of the state a C host passes in
    pub fn to_host(&self) -> HostWindow {
        HostWindow {
            id: self.id,
            flags: self.flags.bits(),
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

impl From<HostWindow> for Window {
    fn from(host: HostWindow) -> Self {
        Self {
            id: host.id,
            title: String::new(),
            x: host.x,
            y: host.y,
            w: host.w,
            h: host.h,
            flags: WindowFlags::from_bits_truncate(host.flags),
            driver_data: None,
        }
    }
}

/// Icon image handed to `set_window_icon`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub w: u32,
    pub h: u32,
    /// ARGB8888 pixels, row-major
    pub pixels: Vec<u32>,
}

/// Native window handle passed to `create_window_from`
pub type ForeignWindow<'a> = &'a dyn Any;
