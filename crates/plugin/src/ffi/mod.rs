//! C ABI surface
//!
//! [`exports`] covers backend lifecycle, errors, threads and the timer;
//! [`video`] covers the video driver bootstrap record and device table.

pub mod exports;
pub mod video;
