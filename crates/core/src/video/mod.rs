//! Video backend
//!
//! The host drives a video backend through [`VideoDriver`], one method per
//! entry of its driver table. Backends are compiled in as
//! [`VideoBootStrap`] records and one is picked at startup by
//! [`select_video_driver`].
//!
//! The PSL1GHT driver ([`Psl1ghtVideo`]) targets fixed hardware with a single
//! full-screen output: it bootstraps the RSX command buffer on init and
//! treats every window-manager request as a no-op.
//!
//! # Example
//!
//! ```ignore
//! use psl1ght_core::video::{select_video_driver, Window, VIDEO_DRIVERS};
//! use psl1ght_native::Platform;
//!
//! let mut video = select_video_driver(VIDEO_DRIVERS, None, 0, &Platform::native())?;
//! video.video_init()?;
//!
//! let mut window = Window::new(1, "game", 1280, 720);
//! video.create_window(&mut window)?;
//! // ...
//! video.destroy_window(&mut window);
//! video.video_quit();
//! ```

pub mod bootstrap;
pub mod device;
pub mod events;
pub mod gl;
pub mod modes;
pub mod window;

use psl1ght_sdk::DisplayMode;

use crate::error::BackendResult;

pub use bootstrap::{select_video_driver, VideoBootStrap, PSL1GHT_BOOTSTRAP, VIDEO_DRIVERS};
pub use device::{DeviceData, Psl1ghtVideo};
pub use events::{ChannelSysEvents, SysEvents, SystemEvent, SysutilSender};
pub use gl::GlContext;
pub use modes::{DisplayModes, StaticModes};
pub use window::{ForeignWindow, Icon, Window, WindowData, WindowFlags, WindowId};

/// Driver table the host calls into
///
/// Every method corresponds to one host driver callback. Window operations
/// receive the host's window object; drivers keep their own per-window
/// state in [`Window::driver_data`].
pub trait VideoDriver: Send {
    /// Driver name as registered in its bootstrap record
    fn name(&self) -> &'static str;

    // === Device lifecycle ===

    /// Bring up the display and graphics hardware
    fn video_init(&mut self) -> BackendResult<()>;

    /// Release everything acquired by [`VideoDriver::video_init`]
    fn video_quit(&mut self);

    /// Whether the device is between init and quit
    fn is_initialized(&self) -> bool;

    // === Display modes ===

    /// Modes the display supports
    fn display_modes(&self) -> Vec<DisplayMode>;

    /// Switch the display mode
    fn set_display_mode(&mut self, mode: &DisplayMode) -> BackendResult<()>;

    // === Windows ===

    /// Attach driver state to a newly created host window
    fn create_window(&mut self, window: &mut Window) -> BackendResult<()>;

    /// Adopt a window created outside the host
    fn create_window_from(&mut self, window: &mut Window, data: ForeignWindow<'_>)
        -> BackendResult<()>;

    fn set_window_title(&mut self, window: &mut Window);
    fn set_window_icon(&mut self, window: &mut Window, icon: &Icon);
    fn set_window_position(&mut self, window: &mut Window);
    fn set_window_size(&mut self, window: &mut Window);
    fn show_window(&mut self, window: &mut Window);
    fn hide_window(&mut self, window: &mut Window);
    fn raise_window(&mut self, window: &mut Window);
    fn maximize_window(&mut self, window: &mut Window);
    fn minimize_window(&mut self, window: &mut Window);
    fn restore_window(&mut self, window: &mut Window);
    fn set_window_grab(&mut self, window: &mut Window, grabbed: bool);

    /// Called before the host releases a window
    fn destroy_window(&mut self, window: &mut Window);

    // === Screen keyboard ===

    fn has_screen_keyboard_support(&self) -> bool;
    fn show_screen_keyboard(&mut self, window: &mut Window);
    fn hide_screen_keyboard(&mut self, window: &mut Window);
    fn is_screen_keyboard_shown(&self, window: &Window) -> bool;

    // === Events ===

    /// Collect pending system events for the host queue
    fn pump_events(&mut self) -> Vec<SystemEvent>;

    /// Handle for posting raw sysutil notifications from any thread
    fn sysutil_sender(&self) -> Option<SysutilSender> {
        None
    }

    // === OpenGL ===

    /// Create an OpenGL context for `window`
    fn gl_create_context(&mut self, window: &mut Window) -> BackendResult<GlContext>;
}
