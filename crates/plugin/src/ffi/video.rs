//! C-compatible video driver bootstrap and device table
//!
//! The host finds the driver through the exported `PSL1GHT_bootstrap`
//! record. Its `create` callback returns a [`VideoDeviceTable`]: one
//! function pointer per driver callback plus an opaque pointer to the
//! driver itself. The host keeps the table until it calls `free`.
//!
//! Windows are identified by the host's [`HostWindow`] record. The table
//! keeps the matching [`Window`] (with its driver data) until
//! `destroy_window` and refreshes it from the host record on every call.
//! Only `create_window` writes back to the host record.

use std::collections::{HashMap, VecDeque};
use std::ffi::{c_char, c_int, c_void, CStr};

use tracing::instrument;

use psl1ght_core::video::{Icon, SystemEvent, Window, WindowFlags, WindowId, PSL1GHT_BOOTSTRAP};
use psl1ght_core::VideoDriver;
use psl1ght_sdk::{DisplayMode, HostWindow};

use crate::error::set_error;
use crate::globals::{globals, is_main_thread};

pub const PSL1GHT_EVENT_QUIT: c_int = 1;
pub const PSL1GHT_EVENT_FOCUS_LOST: c_int = 2;
pub const PSL1GHT_EVENT_FOCUS_GAINED: c_int = 3;
pub const PSL1GHT_EVENT_DRAW_BEGIN: c_int = 4;
pub const PSL1GHT_EVENT_DRAW_END: c_int = 5;

/// Events held for the host between pumps; the oldest are dropped beyond this
const PENDING_CAPACITY: usize = 64;

fn event_code(event: SystemEvent) -> c_int {
    match event {
        SystemEvent::Quit => PSL1GHT_EVENT_QUIT,
        SystemEvent::FocusLost => PSL1GHT_EVENT_FOCUS_LOST,
        SystemEvent::FocusGained => PSL1GHT_EVENT_FOCUS_GAINED,
        SystemEvent::DrawBegin => PSL1GHT_EVENT_DRAW_BEGIN,
        SystemEvent::DrawEnd => PSL1GHT_EVENT_DRAW_END,
    }
}

/// Driver bootstrap record as the host sees it
#[repr(C)]
pub struct VideoBootStrapRecord {
    pub name: *const c_char,
    pub desc: *const c_char,
    pub available: extern "C" fn() -> c_int,
    pub create: extern "C" fn(devindex: c_int) -> *mut VideoDeviceTable,
}

// SAFETY: Only points at static strings and functions.
unsafe impl Sync for VideoBootStrapRecord {}

const NAME: &CStr = c"psl1ght";
const DESC: &CStr = c"SDL psl1ght video driver";

#[no_mangle]
#[allow(non_upper_case_globals)]
pub static PSL1GHT_bootstrap: VideoBootStrapRecord = VideoBootStrapRecord {
    name: NAME.as_ptr(),
    desc: DESC.as_ptr(),
    available: psl1ght_available,
    create: psl1ght_create_device,
};

type WindowFn = unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow);

/// Driver callbacks handed to the host
///
/// Every callback takes the table it was read from as its first argument.
#[repr(C)]
pub struct VideoDeviceTable {
    /// Driver state, owned by the table
    pub driverdata: *mut c_void,

    pub video_init: unsafe extern "C" fn(*mut VideoDeviceTable) -> c_int,
    pub video_quit: unsafe extern "C" fn(*mut VideoDeviceTable),
    /// Writes up to `max` modes to `modes`, returns the number available
    pub get_display_modes:
        unsafe extern "C" fn(*mut VideoDeviceTable, modes: *mut DisplayMode, max: c_int) -> c_int,
    pub set_display_mode:
        unsafe extern "C" fn(*mut VideoDeviceTable, mode: *const DisplayMode) -> c_int,

    pub create_window: unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow) -> c_int,
    pub create_window_from:
        unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow, data: *const c_void) -> c_int,
    pub set_window_title:
        unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow, title: *const c_char),
    pub set_window_icon: unsafe extern "C" fn(
        *mut VideoDeviceTable,
        *mut HostWindow,
        pixels: *const u32,
        w: c_int,
        h: c_int,
    ),
    pub set_window_position: WindowFn,
    pub set_window_size: WindowFn,
    pub show_window: WindowFn,
    pub hide_window: WindowFn,
    pub raise_window: WindowFn,
    pub maximize_window: WindowFn,
    pub minimize_window: WindowFn,
    pub restore_window: WindowFn,
    pub set_window_grab: unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow, bool),
    pub destroy_window: WindowFn,

    pub has_screen_keyboard_support: unsafe extern "C" fn(*mut VideoDeviceTable) -> bool,
    pub show_screen_keyboard: WindowFn,
    pub hide_screen_keyboard: WindowFn,
    pub is_screen_keyboard_shown:
        unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow) -> bool,

    /// Writes up to `max` `PSL1GHT_EVENT_*` codes, returns how many. With a
    /// null buffer or `max <= 0`, returns how many are waiting instead.
    pub pump_events:
        unsafe extern "C" fn(*mut VideoDeviceTable, events: *mut c_int, max: c_int) -> c_int,
    /// Returns a context handle, or null with the error message set
    pub gl_create_context: unsafe extern "C" fn(*mut VideoDeviceTable, *mut HostWindow) -> *mut c_void,

    pub free: unsafe extern "C" fn(*mut VideoDeviceTable),
}

/// Driver plus the host windows it has seen
struct DeviceState {
    driver: Box<dyn VideoDriver>,
    windows: HashMap<WindowId, Window>,
    pending: VecDeque<SystemEvent>,
}

extern "C" fn psl1ght_available() -> c_int {
    c_int::from((PSL1GHT_BOOTSTRAP.available)())
}

#[instrument(skip_all)]
extern "C" fn psl1ght_create_device(devindex: c_int) -> *mut VideoDeviceTable {
    let globals = globals();
    if !is_main_thread() {
        tracing::warn!("Video device created off the main thread");
    }

    let driver = match globals.backend().create_video(devindex) {
        Ok(driver) => driver,
        Err(e) => {
            set_error(e);
            return std::ptr::null_mut();
        }
    };
    globals.set_sysutil(driver.sysutil_sender());

    let state = Box::new(DeviceState {
        driver,
        windows: HashMap::new(),
        pending: VecDeque::new(),
    });

    Box::into_raw(Box::new(VideoDeviceTable {
        driverdata: Box::into_raw(state) as *mut c_void,
        video_init,
        video_quit,
        get_display_modes,
        set_display_mode,
        create_window,
        create_window_from,
        set_window_title,
        set_window_icon,
        set_window_position,
        set_window_size,
        show_window,
        hide_window,
        raise_window,
        maximize_window,
        minimize_window,
        restore_window,
        set_window_grab,
        destroy_window,
        has_screen_keyboard_support,
        show_screen_keyboard,
        hide_screen_keyboard,
        is_screen_keyboard_shown,
        pump_events,
        gl_create_context,
        free: free_device,
    }))
}

/// Queue a raw sysutil status for the active video device
///
/// Call from the host's sysutil callback; safe from any thread. Returns
/// `false` if there is no device or the queue is full.
#[no_mangle]
pub extern "C" fn psl1ght_post_sysutil(status: u64) -> bool {
    globals().post_sysutil(status)
}

unsafe fn state<'a>(this: *mut VideoDeviceTable) -> Option<&'a mut DeviceState> {
    if this.is_null() {
        return None;
    }
    ((*this).driverdata as *mut DeviceState).as_mut()
}

fn status(result: psl1ght_core::BackendResult<()>) -> c_int {
    match result {
        Ok(()) => 0,
        Err(e) => {
            set_error(e);
            -1
        }
    }
}

/// Run `f` on the tracked window for `host`
unsafe fn with_window<R>(
    this: *mut VideoDeviceTable,
    host: *mut HostWindow,
    f: impl FnOnce(&mut dyn VideoDriver, &mut Window) -> R,
) -> Option<R> {
    let state = state(this)?;
    let host = host.as_mut()?;

    let window = state
        .windows
        .entry(host.id)
        .or_insert_with(|| Window::from(*host));
    window.x = host.x;
    window.y = host.y;
    window.w = host.w;
    window.h = host.h;
    window.flags = WindowFlags::from_bits_truncate(host.flags);

    Some(f(state.driver.as_mut(), window))
}

unsafe extern "C" fn video_init(this: *mut VideoDeviceTable) -> c_int {
    match state(this) {
        Some(state) => status(state.driver.video_init()),
        None => -1,
    }
}

unsafe extern "C" fn video_quit(this: *mut VideoDeviceTable) {
    if let Some(state) = state(this) {
        state.driver.video_quit();
        state.pending.clear();
    }
}

unsafe extern "C" fn get_display_modes(
    this: *mut VideoDeviceTable,
    modes: *mut DisplayMode,
    max: c_int,
) -> c_int {
    let Some(state) = state(this) else {
        return 0;
    };
    let available = state.driver.display_modes();
    if !modes.is_null() {
        let n = available.len().min(max.max(0) as usize);
        std::ptr::copy_nonoverlapping(available.as_ptr(), modes, n);
    }
    available.len() as c_int
}

unsafe extern "C" fn set_display_mode(this: *mut VideoDeviceTable, mode: *const DisplayMode) -> c_int {
    match (state(this), mode.as_ref()) {
        (Some(state), Some(mode)) => status(state.driver.set_display_mode(mode)),
        _ => -1,
    }
}

unsafe extern "C" fn create_window(this: *mut VideoDeviceTable, host: *mut HostWindow) -> c_int {
    let Some(state) = state(this) else {
        return -1;
    };
    let Some(host) = host.as_mut() else {
        return -1;
    };

    let mut window = Window::from(*host);
    if let Err(e) = state.driver.create_window(&mut window) {
        set_error(e);
        return -1;
    }
    *host = window.to_host();
    state.windows.insert(window.id, window);
    0
}

unsafe extern "C" fn create_window_from(
    this: *mut VideoDeviceTable,
    host: *mut HostWindow,
    data: *const c_void,
) -> c_int {
    let handle = data as usize;
    let Some(state) = state(this) else {
        return -1;
    };
    let Some(host) = host.as_mut() else {
        return -1;
    };
    let mut window = Window::from(*host);
    status(state.driver.create_window_from(&mut window, &handle))
}

unsafe extern "C" fn set_window_title(
    this: *mut VideoDeviceTable,
    host: *mut HostWindow,
    title: *const c_char,
) {
    let title = if title.is_null() {
        String::new()
    } else {
        CStr::from_ptr(title).to_string_lossy().into_owned()
    };
    with_window(this, host, |driver, window| {
        window.title = title;
        driver.set_window_title(window);
    });
}

unsafe extern "C" fn set_window_icon(
    this: *mut VideoDeviceTable,
    host: *mut HostWindow,
    pixels: *const u32,
    w: c_int,
    h: c_int,
) {
    let (w, h) = (w.max(0) as u32, h.max(0) as u32);
    let len = (w as usize)
        .checked_mul(h as usize)
        .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<u32>());
    let Some(len) = len else {
        tracing::warn!("Window icon size {}x{} overflows, ignored", w, h);
        return;
    };
    let pixels = if pixels.is_null() {
        Vec::new()
    } else {
        std::slice::from_raw_parts(pixels, len).to_vec()
    };
    let icon = Icon { w, h, pixels };
    with_window(this, host, |driver, window| driver.set_window_icon(window, &icon));
}

macro_rules! window_op {
    ($($name:ident),* $(,)?) => {
        $(
            unsafe extern "C" fn $name(this: *mut VideoDeviceTable, host: *mut HostWindow) {
                with_window(this, host, |driver, window| driver.$name(window));
            }
        )*
    };
}

window_op!(
    set_window_position,
    set_window_size,
    show_window,
    hide_window,
    raise_window,
    maximize_window,
    minimize_window,
    restore_window,
    show_screen_keyboard,
    hide_screen_keyboard,
);

unsafe extern "C" fn set_window_grab(this: *mut VideoDeviceTable, host: *mut HostWindow, grabbed: bool) {
    with_window(this, host, |driver, window| driver.set_window_grab(window, grabbed));
}

unsafe extern "C" fn destroy_window(this: *mut VideoDeviceTable, host: *mut HostWindow) {
    let Some(id) = host.as_ref().map(|h| h.id) else {
        return;
    };
    with_window(this, host, |driver, window| driver.destroy_window(window));
    if let Some(state) = state(this) {
        // Releases the window's driver data
        state.windows.remove(&id);
    }
}

unsafe extern "C" fn has_screen_keyboard_support(this: *mut VideoDeviceTable) -> bool {
    state(this).is_some_and(|s| s.driver.has_screen_keyboard_support())
}

unsafe extern "C" fn is_screen_keyboard_shown(this: *mut VideoDeviceTable, host: *mut HostWindow) -> bool {
    with_window(this, host, |driver, window| driver.is_screen_keyboard_shown(window))
        .unwrap_or(false)
}

unsafe extern "C" fn pump_events(this: *mut VideoDeviceTable, events: *mut c_int, max: c_int) -> c_int {
    let Some(state) = state(this) else {
        return 0;
    };
    state.pending.extend(state.driver.pump_events());
    if state.pending.len() > PENDING_CAPACITY {
        let dropped = state.pending.len() - PENDING_CAPACITY;
        state.pending.drain(..dropped);
        tracing::warn!("Host event queue full, dropped {} oldest events", dropped);
    }
    if events.is_null() || max <= 0 {
        // Peek: report what is waiting without consuming it
        return state.pending.len() as c_int;
    }

    let mut written = 0;
    while written < max {
        let Some(event) = state.pending.pop_front() else {
            break;
        };
        *events.add(written as usize) = event_code(event);
        written += 1;
    }
    written
}

unsafe extern "C" fn gl_create_context(this: *mut VideoDeviceTable, host: *mut HostWindow) -> *mut c_void {
    match with_window(this, host, |driver, window| driver.gl_create_context(window)) {
        Some(Ok(context)) => Box::into_raw(Box::new(context)) as *mut c_void,
        Some(Err(e)) => {
            set_error(e);
            std::ptr::null_mut()
        }
        None => std::ptr::null_mut(),
    }
}

unsafe extern "C" fn free_device(this: *mut VideoDeviceTable) {
    if this.is_null() {
        return;
    }
    let table = Box::from_raw(this);
    if !table.driverdata.is_null() {
        let state = Box::from_raw(table.driverdata as *mut DeviceState);
        if let Some(sender) = state.driver.sysutil_sender() {
            globals().clear_sysutil(&sender);
        }
        // Dropping the driver quits it if the host did not
        drop(state);
    }
    tracing::debug!("Video device freed");
}
