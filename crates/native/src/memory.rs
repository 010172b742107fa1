//! Shared IO memory and the RSX command buffer
//!
//! The RSX reads commands out of a region of main memory mapped into its IO
//! address space. That region must stay alive for as long as the command
//! buffer is in use, so [`CommandBuffer`] holds a reference to it.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::Arc;

use psl1ght_sdk::GcmContextData;

/// Aligned, zeroed main-memory region shared with the RSX
pub struct IoRegion {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: The region is plain memory owned by this value. The CPU side never
// hands out references into it, only the base address.
unsafe impl Send for IoRegion {}
unsafe impl Sync for IoRegion {}

impl IoRegion {
    /// Allocate a zeroed region of `size` bytes aligned to `align`
    ///
    /// Returns `None` for a zero size, a non power-of-two alignment, or when
    /// the allocator is out of memory.
    pub fn alloc(size: usize, align: usize) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let layout = Layout::from_size_align(size, align).ok()?;
        // SAFETY: layout has a nonzero size
        let ptr = NonNull::new(unsafe { alloc_zeroed(layout) })?;
        tracing::debug!("IO region allocated: {:p} ({} bytes)", ptr, size);
        Some(Self { ptr, layout })
    }

    /// Base address of the region
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// Always false, zero-sized regions are never allocated
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Alignment the region was allocated with
    pub fn align(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for IoRegion {
    fn drop(&mut self) {
        tracing::debug!("IO region released: {:p}", self.ptr);
        // SAFETY: ptr was returned by alloc_zeroed with this exact layout
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

impl std::fmt::Debug for IoRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoRegion")
            .field("ptr", &self.ptr)
            .field("size", &self.layout.size())
            .field("align", &self.layout.align())
            .finish()
    }
}

/// RSX command buffer context
///
/// The command area occupies the first `size` bytes of the IO region.
pub struct CommandBuffer {
    io: Arc<IoRegion>,
    size: usize,
    context: Option<NonNull<GcmContextData>>,
}

// SAFETY: The gcm context is only touched by the thread that owns the video
// device; this value just carries the pointer around.
unsafe impl Send for CommandBuffer {}
unsafe impl Sync for CommandBuffer {}

impl CommandBuffer {
    /// Command buffer driven from software, with no native gcm context
    ///
    /// Returns `None` if the command area does not fit into the IO region.
    pub fn software(io: &Arc<IoRegion>, size: usize) -> Option<Self> {
        if size == 0 || size > io.len() {
            return None;
        }
        Some(Self {
            io: Arc::clone(io),
            size,
            context: None,
        })
    }

    /// Command buffer backed by a gcm context returned from `rsxInit`
    ///
    /// Returns `None` if `context` is null.
    pub fn native(io: &Arc<IoRegion>, size: usize, context: *mut GcmContextData) -> Option<Self> {
        let context = NonNull::new(context)?;
        Some(Self {
            io: Arc::clone(io),
            size,
            context: Some(context),
        })
    }

    /// The IO region backing this command buffer
    pub fn io(&self) -> &Arc<IoRegion> {
        &self.io
    }

    /// Size of the command area in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Native gcm context, `None` for software command buffers
    pub fn context_ptr(&self) -> Option<*mut GcmContextData> {
        self.context.map(NonNull::as_ptr)
    }
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("io", &self.io.as_ptr())
            .field("size", &self.size)
            .field("context", &self.context)
            .finish()
    }
}
