//! Asynchronous signal masking for backend threads
//!
//! Threads created by the backend should not receive the asynchronous
//! process signals listed in [`ASYNC_SIGNALS`]. lv2 has no `sigprocmask`,
//! so masking is a no-op: the set is built but never applied. Once PSL1GHT
//! grows signal support this is where it gets wired in.

#[cfg(unix)]
use nix::sys::signal::{SigSet, Signal};

/// Signals a backend thread should never handle
#[cfg(unix)]
pub const ASYNC_SIGNALS: &[Signal] = &[
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGPIPE,
    Signal::SIGALRM,
    Signal::SIGTERM,
    Signal::SIGWINCH,
];

/// Build the set of [`ASYNC_SIGNALS`]
#[cfg(unix)]
pub fn async_signal_set() -> SigSet {
    let mut set = SigSet::empty();
    for &signal in ASYNC_SIGNALS {
        set.add(signal);
    }
    set
}

/// Mask asynchronous signals on the calling thread
///
/// Always a no-op on this backend. Returns whether a mask was applied,
/// which is never.
pub fn mask_async_signals() -> bool {
    #[cfg(unix)]
    let _mask = async_signal_set();
    tracing::trace!("Signal masking not supported by lv2, signals left unmasked");
    false
}
