//! PSL1GHT backend - Core Logic
//!
//! Thread, timer and video adapters for running a multimedia host library
//! on the PS3 through the PSL1GHT SDK. Each adapter is an explicit state
//! object over the native facilities in [`native`]; [`Backend`] bundles one
//! of each.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and native crates for convenience:
//! - [`sdk`] - lv2 types, host records and fixed constants
//! - [`native`] - Native facility traits and their implementations

pub use psl1ght_native as native;
pub use psl1ght_sdk as sdk;

pub mod alloc;
pub mod backend;
pub mod config;
pub mod error;
pub mod thread;
pub mod timer;
pub mod video;

#[cfg(test)]
mod test_support;

pub use backend::Backend;
pub use config::{BackendConfig, ConfigError, ConfigResult};
pub use error::{BackendError, BackendResult};
pub use thread::{native_priority, ThreadAdapter, ThreadHandle};
pub use timer::{delay, ticks_passed, Ticks};
pub use video::{
    select_video_driver, Psl1ghtVideo, SystemEvent, VideoBootStrap, VideoDriver, Window,
    WindowFlags, PSL1GHT_BOOTSTRAP, VIDEO_DRIVERS,
};
