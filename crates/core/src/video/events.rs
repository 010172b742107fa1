//! System-event collaborator
//!
//! lv2 reports system notifications (quit request, XMB menu, system
//! overlay drawing) through sysutil callbacks that may fire on any thread.
//! [`ChannelSysEvents`] queues them over a channel and translates them into
//! [`SystemEvent`]s when the host pumps events.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use psl1ght_sdk::{
    SYSUTIL_DRAW_BEGIN, SYSUTIL_DRAW_END, SYSUTIL_EXIT_GAME, SYSUTIL_MENU_CLOSE,
    SYSUTIL_MENU_OPEN,
};

/// Capacity of the sysutil notification queue
const QUEUE_CAPACITY: usize = 64;

/// Event delivered to the host by `pump_events`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemEvent {
    /// The user asked to quit from the system menu
    Quit,
    /// The XMB menu opened over the game
    FocusLost,
    /// The XMB menu closed
    FocusGained,
    /// The system started drawing over the game
    DrawBegin,
    /// The system stopped drawing over the game
    DrawEnd,
}

impl SystemEvent {
    /// Translate a sysutil status code, `None` for codes the host ignores
    pub fn from_sysutil(status: u64) -> Option<Self> {
        match status {
            SYSUTIL_EXIT_GAME => Some(Self::Quit),
            SYSUTIL_MENU_OPEN => Some(Self::FocusLost),
            SYSUTIL_MENU_CLOSE => Some(Self::FocusGained),
            SYSUTIL_DRAW_BEGIN => Some(Self::DrawBegin),
            SYSUTIL_DRAW_END => Some(Self::DrawEnd),
            _ => None,
        }
    }
}

/// System-event state owned by the video driver
pub trait SysEvents: Send {
    /// Start accepting system notifications
    fn init(&mut self);

    /// Stop accepting notifications and drop anything queued
    fn quit(&mut self);

    /// Drain queued notifications
    fn pump(&mut self) -> Vec<SystemEvent>;
}

/// Sending side handed to the sysutil callback
#[derive(Debug, Clone)]
pub struct SysutilSender {
    sender: Sender<u64>,
}

impl SysutilSender {
    /// Queue a raw sysutil status; safe to call from any thread
    ///
    /// Returns `false` if the queue is full and the status was dropped.
    pub fn notify(&self, status: u64) -> bool {
        match self.sender.try_send(status) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Sysutil queue full, dropping status {:#x}", status);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Whether both senders feed the same queue
    pub fn same_queue(&self, other: &SysutilSender) -> bool {
        self.sender.same_channel(&other.sender)
    }
}

/// Channel-backed system events
pub struct ChannelSysEvents {
    sender: Sender<u64>,
    receiver: Receiver<u64>,
    active: bool,
}

impl ChannelSysEvents {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        Self {
            sender,
            receiver,
            active: false,
        }
    }

    /// Handle for the sysutil callback to post notifications through
    pub fn sender(&self) -> SysutilSender {
        SysutilSender {
            sender: self.sender.clone(),
        }
    }

    /// Whether notifications are currently accepted
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for ChannelSysEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SysEvents for ChannelSysEvents {
    fn init(&mut self) {
        self.active = true;
        tracing::debug!("System events initialized");
    }

    fn quit(&mut self) {
        self.active = false;
        let dropped = self.receiver.try_iter().count();
        if dropped > 0 {
            tracing::debug!("Dropped {} pending system notifications", dropped);
        }
    }

    fn pump(&mut self) -> Vec<SystemEvent> {
        if !self.active {
            return Vec::new();
        }
        self.receiver
            .try_iter()
            .filter_map(SystemEvent::from_sysutil)
            .collect()
    }
}

impl std::fmt::Debug for ChannelSysEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSysEvents")
            .field("pending", &self.receiver.len())
            .field("active", &self.active)
            .finish()
    }
}
