//! The backend instance
//!
//! [`Backend`] owns one of each adapter over a shared [`Platform`]. The
//! plugin keeps a single instance for the C host; Rust callers can create
//! their own. Video devices are created here but owned by the caller.

use psl1ght_native::Platform;

use crate::config::BackendConfig;
use crate::error::BackendResult;
use crate::thread::ThreadAdapter;
use crate::timer::Ticks;
use crate::video::{select_video_driver, VideoDriver, VIDEO_DRIVERS};

pub struct Backend {
    platform: Platform,
    config: BackendConfig,
    pub threads: ThreadAdapter,
    pub ticks: Ticks,
}

impl Backend {
    /// Create a backend over `platform`; nothing is initialized yet
    pub fn new(platform: Platform, config: BackendConfig) -> Self {
        Self {
            threads: ThreadAdapter::new(platform.threads.clone()),
            ticks: Ticks::new(platform.clock.clone()),
            platform,
            config,
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Create an uninitialized device for display `devindex` from the
    /// driver named by the config, or the first available one
    pub fn create_video(&self, devindex: i32) -> BackendResult<Box<dyn VideoDriver>> {
        select_video_driver(
            VIDEO_DRIVERS,
            self.config.video_driver.as_deref(),
            devindex,
            &self.platform,
        )
    }

    /// Stop the timer
    ///
    /// Video devices belong to whoever created them and are quit there.
    pub fn shutdown(&mut self) {
        self.ticks.quit();
        tracing::info!("PSL1GHT backend shut down");
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config", &self.config)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    #[test]
    fn test_create_video_from_default_config() {
        let backend = Backend::new(Platform::hosted(), BackendConfig::default());
        let mut video = backend.create_video(0).unwrap();
        assert_eq!(video.name(), "psl1ght");
        assert!(!video.is_initialized());

        video.video_init().unwrap();
        assert!(video.is_initialized());
        video.video_quit();
    }

    #[test]
    fn test_configured_driver_is_used() {
        let config = BackendConfig {
            video_driver: Some("PSL1GHT".to_string()),
            ..BackendConfig::default()
        };
        let backend = Backend::new(Platform::hosted(), config);
        assert_eq!(backend.create_video(1).unwrap().name(), "psl1ght");
    }

    #[test]
    fn test_configured_driver_must_exist() {
        let config = BackendConfig {
            video_driver: Some("dummy".to_string()),
            ..BackendConfig::default()
        };
        let backend = Backend::new(Platform::hosted(), config);
        assert_eq!(
            backend.create_video(0).err(),
            Some(BackendError::UnknownDriver("dummy".to_string()))
        );
    }

    #[test]
    fn test_shutdown_stops_ticks() {
        let mut backend = Backend::new(Platform::hosted(), BackendConfig::default());
        backend.ticks.init();
        assert!(backend.ticks.is_running());
        backend.shutdown();
        assert!(!backend.ticks.is_running());
    }
}
