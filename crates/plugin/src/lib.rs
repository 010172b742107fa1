//! PSL1GHT backend - FFI Layer
//!
//! This crate provides the C ABI the host library links against: thread,
//! timer and video driver entry points backed by one global
//! [`psl1ght_core::Backend`]. It compiles to a cdylib; `build.rs` writes
//! the matching header to `include/psl1ght_backend.h`.

pub mod error;
pub mod ffi;
pub mod globals;

pub use globals::{globals, is_backend_initialized, is_main_thread};
