//! Global backend storage
//!
//! The C host reaches the backend through free functions, so one
//! [`Backend`] lives in a static. It is created on first use (or by
//! `psl1ght_backend_init`) and never torn down; `psl1ght_backend_quit` only
//! shuts its subsystems down.

use std::sync::OnceLock;
use std::thread::ThreadId;

use parking_lot::{Mutex, MutexGuard};

use psl1ght_core::native::Platform;
use psl1ght_core::video::SysutilSender;
use psl1ght_core::{Backend, BackendConfig};

/// Global backend state
pub struct BackendGlobals {
    backend: Mutex<Backend>,

    /// Sysutil queue of the most recently created video device
    sysutil: Mutex<Option<SysutilSender>>,

    /// Thread that created the backend, expected to own the video device
    pub main_thread_id: ThreadId,
}

static GLOBALS: OnceLock<BackendGlobals> = OnceLock::new();

fn load_config() -> BackendConfig {
    match BackendConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default config: {}", e);
            BackendConfig::default()
        }
    }
}

/// Get the global state, creating the backend on first use
pub fn globals() -> &'static BackendGlobals {
    GLOBALS.get_or_init(|| {
        let config = load_config();
        tracing::debug!("Creating backend with {:?}", config);
        BackendGlobals {
            backend: Mutex::new(Backend::new(Platform::native(), config)),
            sysutil: Mutex::new(None),
            main_thread_id: std::thread::current().id(),
        }
    })
}

/// Check if the backend has been created
pub fn is_backend_initialized() -> bool {
    GLOBALS.get().is_some()
}

/// Check if the current thread is the one that created the backend
pub fn is_main_thread() -> bool {
    GLOBALS
        .get()
        .map(|g| std::thread::current().id() == g.main_thread_id)
        .unwrap_or(false)
}

impl BackendGlobals {
    /// Lock the backend
    ///
    /// Keep the guard short-lived: never hold it across a thread join or a
    /// sleep.
    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock()
    }

    /// Platform the backend runs on
    pub fn platform(&self) -> Platform {
        self.backend.lock().platform().clone()
    }

    /// Remember where sysutil notifications should go
    pub fn set_sysutil(&self, sender: Option<SysutilSender>) {
        *self.sysutil.lock() = sender;
    }

    /// Forget `sender` if it is still the active one
    ///
    /// A newer device's queue stays in place.
    pub fn clear_sysutil(&self, sender: &SysutilSender) {
        let mut slot = self.sysutil.lock();
        if slot.as_ref().is_some_and(|active| active.same_queue(sender)) {
            *slot = None;
        }
    }

    /// Queue a raw sysutil status for the active video device
    ///
    /// Returns `false` if there is no device or its queue is full.
    pub fn post_sysutil(&self, status: u64) -> bool {
        match self.sysutil.lock().as_ref() {
            Some(sender) => sender.notify(status),
            None => {
                tracing::debug!("No video device for sysutil status {:#x}", status);
                false
            }
        }
    }
}
