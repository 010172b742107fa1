//! PSL1GHT Backend SDK - lv2 and Host Type Definitions
//!
//! This crate contains the plain data types shared between the native
//! PSL1GHT layer, the backend adapters and the C host library. It has no
//! dependencies and compiles quickly, allowing parallel compilation of
//! dependent crates.
//!
//! # Modules
//!
//! - [`lv2`] - Native lv2/PSL1GHT types (thread ids, flip modes, time values)
//! - [`host`] - `#[repr(C)]` records exchanged with the host library
//! - [`consts`] - Fixed sizes and values the backend hands to the SDK

pub mod consts;
pub mod host;
pub mod lv2;

pub use host::*;
pub use lv2::*;
