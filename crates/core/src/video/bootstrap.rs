//! Video driver registration and selection

use psl1ght_native::Platform;
use psl1ght_sdk::consts::{VIDEO_DRIVER_DESC, VIDEO_DRIVER_NAME};

use crate::alloc::try_box;
use crate::error::{BackendError, BackendResult};
use crate::video::device::Psl1ghtVideo;
use crate::video::VideoDriver;

/// Creates a driver instance for a device index
pub type CreateDeviceFn = fn(i32, &Platform) -> BackendResult<Box<dyn VideoDriver>>;

/// Compiled-in video driver record
#[derive(Debug, Clone, Copy)]
pub struct VideoBootStrap {
    pub name: &'static str,
    pub desc: &'static str,
    /// Whether the driver can run here; checked before `create`
    pub available: fn() -> bool,
    pub create: CreateDeviceFn,
}

fn psl1ght_available() -> bool {
    true
}

fn psl1ght_create_device(devindex: i32, platform: &Platform) -> BackendResult<Box<dyn VideoDriver>> {
    tracing::debug!("PSL1GHT_CreateDevice({})", devindex);
    let video = try_box(Psl1ghtVideo::new(devindex, platform.gpu.clone()))?;
    Ok(video)
}

pub static PSL1GHT_BOOTSTRAP: VideoBootStrap = VideoBootStrap {
    name: VIDEO_DRIVER_NAME,
    desc: VIDEO_DRIVER_DESC,
    available: psl1ght_available,
    create: psl1ght_create_device,
};

/// Drivers in order of preference
pub static VIDEO_DRIVERS: &[&VideoBootStrap] = &[&PSL1GHT_BOOTSTRAP];

/// Create the requested driver, or the first available one, for display
/// `devindex`
///
/// `hint` is matched case-insensitively against driver names. A hint that
/// names no driver, or names one that is unavailable, is an error rather
/// than a fallback.
pub fn select_video_driver(
    drivers: &[&VideoBootStrap],
    hint: Option<&str>,
    devindex: i32,
    platform: &Platform,
) -> BackendResult<Box<dyn VideoDriver>> {
    if let Some(name) = hint {
        let Some(bootstrap) = drivers
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name) && (b.available)())
        else {
            return Err(BackendError::UnknownDriver(name.to_string()));
        };
        tracing::info!("Using video driver '{}' ({})", bootstrap.name, bootstrap.desc);
        return (bootstrap.create)(devindex, platform);
    }

    for bootstrap in drivers {
        if !(bootstrap.available)() {
            tracing::debug!("Video driver '{}' unavailable", bootstrap.name);
            continue;
        }
        tracing::info!("Using video driver '{}' ({})", bootstrap.name, bootstrap.desc);
        return (bootstrap.create)(devindex, platform);
    }

    Err(BackendError::NoDriverAvailable)
}
