//! Display-mode collaborator
//!
//! The video driver delegates mode enumeration and switching to a
//! [`DisplayModes`] implementation. [`StaticModes`] covers the fixed set of
//! RSX output resolutions.

use psl1ght_sdk::DisplayMode;

use crate::error::{BackendError, BackendResult};

/// RSX output resolutions, best first
pub const RSX_RESOLUTIONS: &[(i32, i32)] = &[(1920, 1080), (1280, 720), (720, 576), (720, 480)];

/// Display-mode state owned by the video driver
pub trait DisplayModes: Send {
    /// Set up the display and its desktop mode
    fn init(&mut self);

    /// Tear down display state
    fn quit(&mut self);

    /// Modes the display can be switched to
    fn modes(&self) -> Vec<DisplayMode>;

    /// Mode currently in use, `None` before `init`
    fn current(&self) -> Option<DisplayMode>;

    /// Switch the display to `mode`
    fn set_mode(&mut self, mode: &DisplayMode) -> BackendResult<()>;
}

/// Fixed mode list with a desktop mode selected on init
#[derive(Debug, Clone)]
pub struct StaticModes {
    available: Vec<DisplayMode>,
    desktop: DisplayMode,
    current: Option<DisplayMode>,
}

impl StaticModes {
    /// Modes from `available`, starting in `desktop`
    pub fn new(available: Vec<DisplayMode>, desktop: DisplayMode) -> Self {
        Self {
            available,
            desktop,
            current: None,
        }
    }

    /// The RSX resolutions at 60 Hz, starting in 1280x720
    pub fn rsx() -> Self {
        let available = RSX_RESOLUTIONS
            .iter()
            .map(|&(w, h)| DisplayMode::argb8888(w, h, 60))
            .collect();
        Self::new(available, DisplayMode::argb8888(1280, 720, 60))
    }

    /// Desktop mode selected on init
    pub fn desktop(&self) -> DisplayMode {
        self.desktop
    }
}

impl Default for StaticModes {
    fn default() -> Self {
        Self::rsx()
    }
}

impl DisplayModes for StaticModes {
    fn init(&mut self) {
        self.current = Some(self.desktop);
        tracing::debug!(
            "Display initialized at {}x{}@{}",
            self.desktop.w,
            self.desktop.h,
            self.desktop.refresh_rate
        );
    }

    fn quit(&mut self) {
        self.current = None;
    }

    fn modes(&self) -> Vec<DisplayMode> {
        self.available.clone()
    }

    fn current(&self) -> Option<DisplayMode> {
        self.current
    }

    fn set_mode(&mut self, mode: &DisplayMode) -> BackendResult<()> {
        if self.current.is_none() {
            return Err(BackendError::NotInitialized);
        }
        if !self.available.contains(mode) {
            tracing::warn!("Display mode {}x{} not available", mode.w, mode.h);
            return Err(BackendError::Unsupported);
        }
        self.current = Some(*mode);
        tracing::debug!("Display mode set to {}x{}", mode.w, mode.h);
        Ok(())
    }
}
