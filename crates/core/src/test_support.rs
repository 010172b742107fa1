//! Recording fakes of the native layer and video collaborators

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use psl1ght_native::{
    CommandBuffer, IoRegion, NativeClock, NativeError, NativeGpu, NativeThreads, ThreadEntry,
};
use psl1ght_sdk::{DisplayMode, FlipMode, ThreadId, TimeVal};

use crate::error::BackendResult;
use crate::video::events::{ChannelSysEvents, SysEvents, SystemEvent};
use crate::video::modes::{DisplayModes, StaticModes};

/// Ordered record of collaborator calls, shared between fakes
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn push(&self, call: &'static str) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

// === Threads ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRecord {
    pub priority: u64,
    pub stack_size: usize,
    pub name: String,
}

#[derive(Default)]
struct ThreadState {
    next_id: ThreadId,
    spawns: Vec<SpawnRecord>,
    joined: Vec<ThreadId>,
    detached: Vec<ThreadId>,
    priorities: Vec<(ThreadId, i32)>,
    fail_spawn: bool,
    fail_priority: bool,
}

/// Runs thread entries synchronously at spawn time and records every call
#[derive(Default)]
pub struct FakeThreads {
    state: Mutex<ThreadState>,
}

impl FakeThreads {
    pub const CALLER_ID: ThreadId = 0x100;

    pub fn fail_spawn(&self, fail: bool) {
        self.state.lock().unwrap().fail_spawn = fail;
    }

    pub fn fail_priority(&self, fail: bool) {
        self.state.lock().unwrap().fail_priority = fail;
    }

    pub fn last_spawn(&self) -> Option<SpawnRecord> {
        self.state.lock().unwrap().spawns.last().cloned()
    }

    pub fn last_priority(&self) -> Option<(ThreadId, i32)> {
        self.state.lock().unwrap().priorities.last().copied()
    }

    pub fn joined(&self) -> Vec<ThreadId> {
        self.state.lock().unwrap().joined.clone()
    }

    pub fn detached(&self) -> Vec<ThreadId> {
        self.state.lock().unwrap().detached.clone()
    }
}

impl NativeThreads for FakeThreads {
    fn spawn(
        &self,
        entry: ThreadEntry,
        priority: u64,
        stack_size: usize,
        name: &str,
    ) -> Result<ThreadId, NativeError> {
        let id = {
            let mut state = self.state.lock().unwrap();
            if state.fail_spawn {
                return Err(NativeError::status("sysThreadCreate", -1));
            }
            state.next_id += 1;
            state.spawns.push(SpawnRecord {
                priority,
                stack_size,
                name: name.to_string(),
            });
            Self::CALLER_ID + state.next_id
        };
        entry();
        Ok(id)
    }

    fn join(&self, id: ThreadId) -> u64 {
        self.state.lock().unwrap().joined.push(id);
        0
    }

    fn detach(&self, id: ThreadId) {
        self.state.lock().unwrap().detached.push(id);
    }

    fn current_id(&self) -> ThreadId {
        Self::CALLER_ID
    }

    fn set_priority(&self, id: ThreadId, value: i32) -> Result<(), NativeError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_priority {
            return Err(NativeError::status("sysThreadSetPriority", -1));
        }
        state.priorities.push((id, value));
        Ok(())
    }
}

// === Clock ===

/// Clock that only moves when told to (or when slept on)
pub struct ManualClock {
    micros: AtomicI64,
    sleeps: Mutex<Vec<u64>>,
}

impl ManualClock {
    pub fn new(start_micros: i64) -> Self {
        Self {
            micros: AtomicI64::new(start_micros),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance_micros(&self, micros: u64) {
        self.micros.fetch_add(micros as i64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_micros(ms * 1000);
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl NativeClock for ManualClock {
    fn now(&self) -> TimeVal {
        TimeVal::from_micros(self.micros.load(Ordering::SeqCst))
    }

    fn usleep(&self, usec: u64) {
        self.sleeps.lock().unwrap().push(usec);
        self.advance_micros(usec);
    }
}

// === GPU ===

#[derive(Default)]
struct GpuState {
    fail_alloc: bool,
    fail_rsx: bool,
    io_request: Option<(usize, usize)>,
    command_size: Option<usize>,
    flip_mode: Option<FlipMode>,
    io: Weak<IoRegion>,
}

/// GPU fake with real IO memory whose lifetime can be observed
pub struct FakeGpu {
    log: CallLog,
    state: Mutex<GpuState>,
}

impl FakeGpu {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            state: Mutex::new(GpuState::default()),
        }
    }

    pub fn fail_alloc(&self, fail: bool) {
        self.state.lock().unwrap().fail_alloc = fail;
    }

    pub fn fail_rsx(&self, fail: bool) {
        self.state.lock().unwrap().fail_rsx = fail;
    }

    pub fn io_request(&self) -> Option<(usize, usize)> {
        self.state.lock().unwrap().io_request
    }

    pub fn command_size(&self) -> Option<usize> {
        self.state.lock().unwrap().command_size
    }

    pub fn flip_mode(&self) -> Option<FlipMode> {
        self.state.lock().unwrap().flip_mode
    }

    /// Whether the last IO region handed out is still allocated
    pub fn io_alive(&self) -> bool {
        self.state.lock().unwrap().io.upgrade().is_some()
    }
}

impl NativeGpu for FakeGpu {
    fn alloc_io(&self, size: usize, align: usize) -> Option<Arc<IoRegion>> {
        self.log.push("gpu.alloc_io");
        let mut state = self.state.lock().unwrap();
        state.io_request = Some((size, align));
        if state.fail_alloc {
            return None;
        }
        let io = Arc::new(IoRegion::alloc(size, align)?);
        state.io = Arc::downgrade(&io);
        Some(io)
    }

    fn rsx_init(&self, command_size: usize, io: &Arc<IoRegion>) -> Option<CommandBuffer> {
        self.log.push("gpu.rsx_init");
        let mut state = self.state.lock().unwrap();
        state.command_size = Some(command_size);
        if state.fail_rsx {
            return None;
        }
        CommandBuffer::software(io, command_size)
    }

    fn set_flip_mode(&self, mode: FlipMode) {
        self.log.push("gpu.set_flip_mode");
        self.state.lock().unwrap().flip_mode = Some(mode);
    }
}

// === Video collaborators ===

/// [`StaticModes`] that logs lifecycle calls
pub struct RecordingModes {
    log: CallLog,
    inner: StaticModes,
}

impl RecordingModes {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            inner: StaticModes::rsx(),
        }
    }
}

impl DisplayModes for RecordingModes {
    fn init(&mut self) {
        self.log.push("modes.init");
        self.inner.init();
    }

    fn quit(&mut self) {
        self.log.push("modes.quit");
        self.inner.quit();
    }

    fn modes(&self) -> Vec<DisplayMode> {
        self.inner.modes()
    }

    fn current(&self) -> Option<DisplayMode> {
        self.inner.current()
    }

    fn set_mode(&mut self, mode: &DisplayMode) -> BackendResult<()> {
        self.inner.set_mode(mode)
    }
}

/// [`ChannelSysEvents`] that logs lifecycle calls
pub struct RecordingEvents {
    log: CallLog,
    inner: ChannelSysEvents,
}

impl RecordingEvents {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            inner: ChannelSysEvents::new(),
        }
    }
}

impl SysEvents for RecordingEvents {
    fn init(&mut self) {
        self.log.push("events.init");
        self.inner.init();
    }

    fn quit(&mut self) {
        self.log.push("events.quit");
        self.inner.quit();
    }

    fn pump(&mut self) -> Vec<SystemEvent> {
        self.inner.pump()
    }
}
