//! PSL1GHT Native Layer - lv2 Platform Primitives
//!
//! This crate handles:
//! - The native facilities the backend consumes (threads, wall clock,
//!   microsecond sleep, RSX command-buffer bootstrap, flip mode)
//! - A hosted implementation on top of std/libc for development and tests
//! - The lv2 implementation linking the PSL1GHT C SDK (feature `lv2`)
//!
//! # Architecture
//!
//! Each facility is a trait ([`NativeThreads`], [`NativeClock`],
//! [`NativeGpu`]). A [`Platform`] bundles one implementation of each and is
//! handed to the adapters in `psl1ght-core` at startup. Nothing in this crate
//! keeps global state.

pub mod error;
pub mod hosted;
#[cfg(feature = "lv2")]
pub mod lv2;
pub mod memory;
pub mod platform;

pub use error::NativeError;
pub use memory::{CommandBuffer, IoRegion};
pub use platform::{NativeClock, NativeGpu, NativeThreads, Platform, ThreadEntry};
