//! Hosted native layer
//!
//! Runs the backend on a regular OS for development and tests: std threads
//! stand in for PPU threads, the system clock for `gettimeofday` and a
//! software command buffer for `rsxInit`.

mod clock;
mod gpu;
mod threads;

pub use clock::HostedClock;
pub use gpu::HostedGpu;
pub use threads::{HostedThreads, HOSTED_MIN_STACK_SIZE};
