//! Software stand-in for the RSX bootstrap

use std::sync::Arc;

use parking_lot::Mutex;
use psl1ght_sdk::FlipMode;

use crate::memory::{CommandBuffer, IoRegion};
use crate::platform::NativeGpu;

/// Hosted GPU: IO memory from the global allocator, software command buffer
#[derive(Debug, Default)]
pub struct HostedGpu {
    flip_mode: Mutex<Option<FlipMode>>,
}

impl HostedGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last flip mode set, if any
    pub fn flip_mode(&self) -> Option<FlipMode> {
        *self.flip_mode.lock()
    }
}

impl NativeGpu for HostedGpu {
    fn rsx_init(&self, command_size: usize, io: &Arc<IoRegion>) -> Option<CommandBuffer> {
        let buffer = CommandBuffer::software(io, command_size);
        if buffer.is_none() {
            tracing::error!(
                "Command buffer of {:#x} bytes does not fit IO region of {:#x} bytes",
                command_size,
                io.len()
            );
        }
        buffer
    }

    fn set_flip_mode(&self, mode: FlipMode) {
        tracing::debug!("Flip mode set to {:?}", mode);
        *self.flip_mode.lock() = Some(mode);
    }
}
