//! PSL1GHT video device
//!
//! The only real work done here is the RSX bootstrap in `video_init`: a
//! 1 MiB IO region aligned to 1 MiB is handed to `rsxInit` together with a
//! 64 KiB command buffer, and buffer flips are synchronised to vertical
//! blank. Failures there are unrecoverable on fixed hardware and panic.
//!
//! There is no window manager on the console. All window requests other
//! than creation are deliberate no-ops and leave the host window untouched.

use std::sync::Arc;

use psl1ght_native::{CommandBuffer, NativeGpu};
use psl1ght_sdk::consts::{
    RSX_COMMAND_BUFFER_SIZE, RSX_IO_ALIGN, RSX_IO_SIZE, VIDEO_DRIVER_NAME,
};
use psl1ght_sdk::{DisplayMode, FlipMode};

use crate::alloc::try_box;
use crate::error::{BackendError, BackendResult};
use crate::video::events::{ChannelSysEvents, SysEvents, SystemEvent, SysutilSender};
use crate::video::gl::{self, GlContext};
use crate::video::modes::{DisplayModes, StaticModes};
use crate::video::window::{ForeignWindow, Icon, Window, WindowData, WindowFlags, WindowId};
use crate::video::VideoDriver;

/// Driver state that exists between `video_init` and `video_quit`
#[derive(Debug, Default)]
pub struct DeviceData {
    command_buffer: Option<CommandBuffer>,
}

impl DeviceData {
    /// The RSX command buffer set up by `video_init`
    pub fn command_buffer(&self) -> Option<&CommandBuffer> {
        self.command_buffer.as_ref()
    }
}

/// Allocate the shared IO region and bring up the RSX command buffer
///
/// # Panics
/// If either step fails.
fn initialize_gpu(gpu: &dyn NativeGpu) -> CommandBuffer {
    tracing::debug!("initializeGPU()");

    let Some(io) = gpu.alloc_io(RSX_IO_SIZE, RSX_IO_ALIGN) else {
        panic!("RSX IO region allocation failed ({RSX_IO_SIZE:#x} bytes)");
    };
    let Some(command_buffer) = gpu.rsx_init(RSX_COMMAND_BUFFER_SIZE, &io) else {
        panic!("rsxInit failed to set up the command buffer");
    };

    tracing::info!(
        "RSX initialized: io={:p} command buffer={:#x} bytes",
        io.as_ptr(),
        command_buffer.size()
    );
    command_buffer
}

/// Video driver for the PS3 via PSL1GHT
pub struct Psl1ghtVideo {
    devindex: i32,
    gpu: Arc<dyn NativeGpu>,
    modes: Box<dyn DisplayModes>,
    events: Box<dyn SysEvents>,
    sysutil: Option<SysutilSender>,
    device: Option<Box<DeviceData>>,
    keyboard_focus: Option<WindowId>,
}

impl Psl1ghtVideo {
    /// Driver with the RSX mode list and channel-backed system events
    pub fn new(devindex: i32, gpu: Arc<dyn NativeGpu>) -> Self {
        let events = ChannelSysEvents::new();
        let sysutil = events.sender();
        let mut video = Self::with_collaborators(
            devindex,
            gpu,
            Box::new(StaticModes::rsx()),
            Box::new(events),
        );
        video.sysutil = Some(sysutil);
        video
    }

    /// Driver with explicit display-mode and system-event collaborators
    pub fn with_collaborators(
        devindex: i32,
        gpu: Arc<dyn NativeGpu>,
        modes: Box<dyn DisplayModes>,
        events: Box<dyn SysEvents>,
    ) -> Self {
        Self {
            devindex,
            gpu,
            modes,
            events,
            sysutil: None,
            device: None,
            keyboard_focus: None,
        }
    }

    /// Device index this driver was created for
    pub fn devindex(&self) -> i32 {
        self.devindex
    }

    /// Device state, present between init and quit
    pub fn device_data(&self) -> Option<&DeviceData> {
        self.device.as_deref()
    }

    /// Window that currently has keyboard focus
    pub fn keyboard_focus(&self) -> Option<WindowId> {
        self.keyboard_focus
    }

    /// Current display mode, `None` outside init/quit
    pub fn current_display_mode(&self) -> Option<DisplayMode> {
        self.modes.current()
    }
}

impl VideoDriver for Psl1ghtVideo {
    fn name(&self) -> &'static str {
        VIDEO_DRIVER_NAME
    }

    fn video_init(&mut self) -> BackendResult<()> {
        if self.device.is_some() {
            return Err(BackendError::AlreadyInitialized);
        }

        let mut devdata = try_box(DeviceData::default())?;

        self.events.init();
        devdata.command_buffer = Some(initialize_gpu(self.gpu.as_ref()));
        self.modes.init();

        // Wait for VSYNC to flip
        self.gpu.set_flip_mode(FlipMode::VSync);

        self.device = Some(devdata);
        tracing::info!("PSL1GHT video initialized (device {})", self.devindex);
        Ok(())
    }

    fn video_quit(&mut self) {
        tracing::debug!("PSL1GHT_VideoQuit()");
        if self.device.is_none() {
            return;
        }
        self.modes.quit();
        self.events.quit();
        self.device = None;
        self.keyboard_focus = None;
    }

    fn is_initialized(&self) -> bool {
        self.device.is_some()
    }

    fn display_modes(&self) -> Vec<DisplayMode> {
        self.modes.modes()
    }

    fn set_display_mode(&mut self, mode: &DisplayMode) -> BackendResult<()> {
        self.modes.set_mode(mode)
    }

    fn create_window(&mut self, window: &mut Window) -> BackendResult<()> {
        window.driver_data = Some(try_box(WindowData)?);

        // Single full-screen surface: the newest window takes keyboard focus
        window.flags.insert(WindowFlags::INPUT_FOCUS);
        self.keyboard_focus = Some(window.id);
        tracing::debug!("Window {} created", window.id);
        Ok(())
    }

    fn create_window_from(
        &mut self,
        _window: &mut Window,
        _data: ForeignWindow<'_>,
    ) -> BackendResult<()> {
        Err(BackendError::Unsupported)
    }

    fn set_window_title(&mut self, _window: &mut Window) {}

    fn set_window_icon(&mut self, _window: &mut Window, _icon: &Icon) {}

    fn set_window_position(&mut self, _window: &mut Window) {}

    fn set_window_size(&mut self, _window: &mut Window) {}

    fn show_window(&mut self, _window: &mut Window) {}

    fn hide_window(&mut self, _window: &mut Window) {}

    fn raise_window(&mut self, _window: &mut Window) {}

    fn maximize_window(&mut self, _window: &mut Window) {}

    fn minimize_window(&mut self, _window: &mut Window) {}

    fn restore_window(&mut self, _window: &mut Window) {}

    fn set_window_grab(&mut self, _window: &mut Window, _grabbed: bool) {}

    fn destroy_window(&mut self, _window: &mut Window) {}

    fn has_screen_keyboard_support(&self) -> bool {
        false
    }

    fn show_screen_keyboard(&mut self, _window: &mut Window) {}

    fn hide_screen_keyboard(&mut self, _window: &mut Window) {}

    fn is_screen_keyboard_shown(&self, _window: &Window) -> bool {
        false
    }

    fn pump_events(&mut self) -> Vec<SystemEvent> {
        self.events.pump()
    }

    fn sysutil_sender(&self) -> Option<SysutilSender> {
        self.sysutil.clone()
    }

    fn gl_create_context(&mut self, window: &mut Window) -> BackendResult<GlContext> {
        gl::create_context(window)
    }
}

impl Drop for Psl1ghtVideo {
    fn drop(&mut self) {
        if self.device.is_some() {
            tracing::warn!("PSL1GHT video dropped while initialized, shutting down");
            self.video_quit();
        }
    }
}

impl std::fmt::Debug for Psl1ghtVideo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Psl1ghtVideo")
            .field("devindex", &self.devindex)
            .field("device", &self.device)
            .field("keyboard_focus", &self.keyboard_focus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CallLog, FakeGpu, RecordingEvents, RecordingModes};
    use psl1ght_sdk::SYSUTIL_EXIT_GAME;

    fn recording_video() -> (CallLog, Arc<FakeGpu>, Psl1ghtVideo) {
        let log = CallLog::default();
        let gpu = Arc::new(FakeGpu::new(log.clone()));
        let video = Psl1ghtVideo::with_collaborators(
            0,
            gpu.clone(),
            Box::new(RecordingModes::new(log.clone())),
            Box::new(RecordingEvents::new(log.clone())),
        );
        (log, gpu, video)
    }

    fn hosted_video() -> Psl1ghtVideo {
        Psl1ghtVideo::new(0, psl1ght_native::Platform::hosted().gpu)
    }

    #[test]
    fn test_init_sequence() {
        let (log, gpu, mut video) = recording_video();
        video.video_init().unwrap();

        assert_eq!(
            log.calls(),
            vec![
                "events.init",
                "gpu.alloc_io",
                "gpu.rsx_init",
                "modes.init",
                "gpu.set_flip_mode"
            ]
        );
        assert_eq!(gpu.io_request(), Some((0x100000, 0x100000)));
        assert_eq!(gpu.command_size(), Some(0x10000));
        assert_eq!(gpu.flip_mode(), Some(FlipMode::VSync));
        assert!(video.is_initialized());
    }

    #[test]
    fn test_init_then_quit_releases_descriptor() {
        let (log, gpu, mut video) = recording_video();
        video.video_init().unwrap();
        assert!(video.device_data().is_some());
        assert!(gpu.io_alive());

        log.clear();
        video.video_quit();

        assert!(video.device_data().is_none());
        assert!(!video.is_initialized());
        assert!(!gpu.io_alive());
        assert_eq!(log.calls(), vec!["modes.quit", "events.quit"]);
    }

    #[test]
    fn test_reinit_after_quit() {
        let (_log, _gpu, mut video) = recording_video();
        video.video_init().unwrap();
        video.video_quit();
        video.video_init().unwrap();
        assert!(video.is_initialized());
    }

    #[test]
    fn test_double_init_rejected() {
        let (_log, _gpu, mut video) = recording_video();
        video.video_init().unwrap();
        assert_eq!(video.video_init(), Err(BackendError::AlreadyInitialized));
    }

    #[test]
    fn test_quit_without_init_is_noop() {
        let (log, _gpu, mut video) = recording_video();
        video.video_quit();
        assert!(log.calls().is_empty());
    }

    #[test]
    #[should_panic(expected = "RSX IO region allocation failed")]
    fn test_io_allocation_failure_panics() {
        let (_log, gpu, mut video) = recording_video();
        gpu.fail_alloc(true);
        let _ = video.video_init();
    }

    #[test]
    #[should_panic(expected = "rsxInit failed")]
    fn test_rsx_failure_panics() {
        let (_log, gpu, mut video) = recording_video();
        gpu.fail_rsx(true);
        let _ = video.video_init();
    }

    #[test]
    fn test_hosted_command_buffer() {
        let mut video = hosted_video();
        video.video_init().unwrap();

        let cmd = video.device_data().unwrap().command_buffer().unwrap();
        assert_eq!(cmd.size(), 0x10000);
        assert_eq!(cmd.io().len(), 0x100000);
        assert_eq!(cmd.io().as_ptr() as usize % 0x100000, 0);
        assert_eq!(
            video.current_display_mode(),
            Some(DisplayMode::argb8888(1280, 720, 60))
        );
        video.video_quit();
        assert_eq!(video.current_display_mode(), None);
    }

    #[test]
    fn test_create_window_attaches_data_and_focus() {
        let mut video = hosted_video();
        video.video_init().unwrap();

        let mut first = Window::new(1, "first", 1280, 720);
        video.create_window(&mut first).unwrap();
        assert_eq!(first.driver_data.as_deref(), Some(&WindowData));
        assert!(first.has_input_focus());
        assert_eq!(video.keyboard_focus(), Some(1));

        let mut second = Window::new(2, "second", 1280, 720);
        video.create_window(&mut second).unwrap();
        assert_eq!(video.keyboard_focus(), Some(2));
    }

    #[test]
    fn test_create_window_from_unsupported() {
        let mut video = hosted_video();
        let mut window = Window::new(1, "foreign", 640, 480);

        let handle: usize = 0xdead_beef;
        assert_eq!(
            video.create_window_from(&mut window, &handle),
            Err(BackendError::Unsupported)
        );
        assert_eq!(
            video.create_window_from(&mut window, &"anything"),
            Err(BackendError::Unsupported)
        );
        assert!(window.driver_data.is_none());
    }

    #[test]
    fn test_window_operations_are_noops() {
        let mut video = hosted_video();
        video.video_init().unwrap();
        let mut window = Window::new(7, "noop", 1280, 720);
        video.create_window(&mut window).unwrap();
        let snapshot = window.clone();
        let icon = Icon {
            w: 1,
            h: 1,
            pixels: vec![0xff00_ff00],
        };

        video.set_window_title(&mut window);
        video.set_window_icon(&mut window, &icon);
        video.set_window_position(&mut window);
        video.set_window_size(&mut window);
        video.show_window(&mut window);
        video.hide_window(&mut window);
        video.raise_window(&mut window);
        video.maximize_window(&mut window);
        video.minimize_window(&mut window);
        video.restore_window(&mut window);
        video.set_window_grab(&mut window, true);
        video.set_window_grab(&mut window, false);
        video.destroy_window(&mut window);

        assert_eq!(window, snapshot);
        assert_eq!(video.keyboard_focus(), Some(7));
    }

    #[test]
    fn test_screen_keyboard_never_shown() {
        let mut video = hosted_video();
        let mut window = Window::new(1, "kbd", 1280, 720);

        assert!(!video.has_screen_keyboard_support());
        assert!(!video.is_screen_keyboard_shown(&window));
        video.show_screen_keyboard(&mut window);
        assert!(!video.is_screen_keyboard_shown(&window));
        video.hide_screen_keyboard(&mut window);
        video.show_screen_keyboard(&mut window);
        assert!(!video.is_screen_keyboard_shown(&window));
    }

    #[test]
    fn test_pump_events_delegates() {
        let mut video = hosted_video();
        video.video_init().unwrap();
        let sender = video.sysutil_sender().unwrap();

        sender.notify(SYSUTIL_EXIT_GAME);
        assert_eq!(video.pump_events(), vec![SystemEvent::Quit]);
        assert!(video.pump_events().is_empty());
    }

    #[test]
    fn test_display_modes_delegate() {
        let mut video = hosted_video();
        assert_eq!(video.display_modes().len(), 4);
        video.video_init().unwrap();

        let mode = DisplayMode::argb8888(720, 480, 60);
        video.set_display_mode(&mode).unwrap();
        assert_eq!(video.current_display_mode(), Some(mode));
    }

    #[test]
    fn test_gl_context_not_implemented() {
        let mut video = hosted_video();
        let mut window = Window::new(1, "gl", 1280, 720);
        let err = video.gl_create_context(&mut window).unwrap_err();
        assert_eq!(err, BackendError::NotImplemented("PSL1GHT_GL_CreateContext"));
        assert_eq!(err.to_string(), "PSL1GHT_GL_CreateContext not implemented yet");
    }

    #[test]
    fn test_drop_while_initialized_releases_io() {
        let (_log, gpu, mut video) = recording_video();
        video.video_init().unwrap();
        drop(video);
        assert!(!gpu.io_alive());
    }
}
