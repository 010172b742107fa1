//! OpenGL support
//!
//! PSL1GHT has no OpenGL implementation wired up; context creation is
//! reported as not implemented.

use crate::error::{BackendError, BackendResult};
use crate::video::window::Window;

/// An OpenGL context bound to a window
#[derive(Debug)]
pub struct GlContext {
    _private: (),
}

/// Create an OpenGL context for `window`
pub fn create_context(window: &Window) -> BackendResult<GlContext> {
    tracing::debug!("GL context requested for window {}", window.id);
    Err(BackendError::NotImplemented("PSL1GHT_GL_CreateContext"))
}
