//! vvctre plugin ABI.
//!
//! vvctre loads the plugin as a shared library and resolves these symbols:
//!
//! - `GetRequiredFunctionCount` / `GetRequiredFunctionNames`: the host
//!   functions the plugin needs, by name
//! - `PluginLoaded`: hands over the core and plugin-manager handles plus the
//!   resolved functions, in the order of `GetRequiredFunctionNames`
//! - `InitialSettingsOpening`: called once before emulation starts
//! - `AfterSwapWindow`: called after every rendered frame
//!
//! All hooks are called from the host's main thread, so the plugin context is
//! kept in a thread-local.

#![allow(non_snake_case)]

use crate::error::HostError;
use crate::host::Host;
use crate::plugin::PluginContext;
use std::cell::{Cell, RefCell};
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr::NonNull;
use tracing::{error, info, warn};

/// Number of host functions the plugin requires
pub const REQUIRED_FUNCTION_COUNT: usize = 4;

/// Host functions the plugin requires, in `PluginLoaded` order
pub const REQUIRED_FUNCTION_NAMES: [&CStr; REQUIRED_FUNCTION_COUNT] = [
    c"vvctre_button_device_new",
    c"vvctre_button_device_get_state",
    c"vvctre_set_custom_touch_state",
    c"vvctre_use_real_touch_state",
];

type ButtonDeviceNewFn =
    unsafe extern "C" fn(plugin_manager: *mut c_void, params: *const c_char) -> *mut c_void;
type ButtonDeviceGetStateFn = unsafe extern "C" fn(device: *mut c_void) -> bool;
type SetCustomTouchStateFn =
    unsafe extern "C" fn(core: *mut c_void, x: f32, y: f32, pressed: bool);
type UseRealTouchStateFn = unsafe extern "C" fn(core: *mut c_void);

#[repr(transparent)]
struct NameTable([*const c_char; REQUIRED_FUNCTION_COUNT]);

// SAFETY: every entry points at a 'static, immutable C string literal.
unsafe impl Sync for NameTable {}

static NAME_TABLE: NameTable = NameTable([
    REQUIRED_FUNCTION_NAMES[0].as_ptr(),
    REQUIRED_FUNCTION_NAMES[1].as_ptr(),
    REQUIRED_FUNCTION_NAMES[2].as_ptr(),
    REQUIRED_FUNCTION_NAMES[3].as_ptr(),
]);

thread_local! {
    static PLUGIN: RefCell<Option<PluginContext<FfiHost>>> = const { RefCell::new(None) };
    static WARNED_INERT: Cell<bool> = const { Cell::new(false) };
}

/// Button device handle owned by vvctre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDevice(NonNull<c_void>);

#[derive(Clone, Copy)]
struct HostFunctions {
    button_device_new: ButtonDeviceNewFn,
    button_device_get_state: ButtonDeviceGetStateFn,
    set_custom_touch_state: SetCustomTouchStateFn,
    use_real_touch_state: UseRealTouchStateFn,
}

impl HostFunctions {
    /// Resolve the host function table passed to `PluginLoaded`.
    ///
    /// # Safety
    /// `table` must be null or point to `REQUIRED_FUNCTION_COUNT` entries whose
    /// non-null values are functions with the signatures above.
    unsafe fn resolve(table: *const *mut c_void) -> Result<Self, HostError> {
        if table.is_null() {
            return Err(HostError::MissingFunctionTable);
        }

        // SAFETY: caller guarantees the table length.
        let entries = unsafe { std::slice::from_raw_parts(table, REQUIRED_FUNCTION_COUNT) };
        if let Some(index) = entries.iter().position(|f| f.is_null()) {
            let name = REQUIRED_FUNCTION_NAMES[index].to_str().unwrap_or("<invalid>");
            return Err(HostError::MissingFunction(name));
        }

        // SAFETY: entries are non-null and the caller guarantees their signatures.
        unsafe {
            Ok(Self {
                button_device_new: std::mem::transmute::<*mut c_void, ButtonDeviceNewFn>(
                    entries[0],
                ),
                button_device_get_state: std::mem::transmute::<
                    *mut c_void,
                    ButtonDeviceGetStateFn,
                >(entries[1]),
                set_custom_touch_state: std::mem::transmute::<*mut c_void, SetCustomTouchStateFn>(
                    entries[2],
                ),
                use_real_touch_state: std::mem::transmute::<*mut c_void, UseRealTouchStateFn>(
                    entries[3],
                ),
            })
        }
    }
}

/// [`Host`] backed by the function pointers vvctre passes to `PluginLoaded`
pub struct FfiHost {
    core: *mut c_void,
    plugin_manager: *mut c_void,
    functions: HostFunctions,
}

impl Host for FfiHost {
    type Device = RawDevice;

    fn new_button_device(&mut self, params: &str) -> Result<RawDevice, HostError> {
        let c_params = CString::new(params)?;
        // SAFETY: the function and plugin manager come from PluginLoaded and
        // c_params outlives the call.
        let device =
            unsafe { (self.functions.button_device_new)(self.plugin_manager, c_params.as_ptr()) };
        NonNull::new(device)
            .map(RawDevice)
            .ok_or_else(|| HostError::NullDevice {
                params: params.to_string(),
            })
    }

    fn button_device_state(&self, device: &RawDevice) -> bool {
        // SAFETY: device was created by the host and is never freed.
        unsafe { (self.functions.button_device_get_state)(device.0.as_ptr()) }
    }

    fn set_custom_touch_state(&mut self, x: f32, y: f32, pressed: bool) {
        // SAFETY: core comes from PluginLoaded.
        unsafe { (self.functions.set_custom_touch_state)(self.core, x, y, pressed) }
    }

    fn use_real_touch_state(&mut self) {
        // SAFETY: core comes from PluginLoaded.
        unsafe { (self.functions.use_real_touch_state)(self.core) }
    }
}

fn init_logging() {
    // The host or another plugin may already own the global subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn with_plugin<R>(hook: &str, f: impl FnOnce(&mut PluginContext<FfiHost>) -> R) -> Option<R> {
    PLUGIN.with_borrow_mut(|plugin| match plugin {
        Some(plugin) => Some(f(plugin)),
        None => {
            // Warn once; AfterSwapWindow runs every frame
            if !WARNED_INERT.replace(true) {
                warn!(
                    "{} ignored: no plugin state on this thread \
                     (PluginLoaded failed or ran on another thread)",
                    hook
                );
            }
            None
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn GetRequiredFunctionCount() -> c_int {
    REQUIRED_FUNCTION_COUNT as c_int
}

#[unsafe(no_mangle)]
pub extern "C" fn GetRequiredFunctionNames() -> *const *const c_char {
    NAME_TABLE.0.as_ptr()
}

/// Receive the host handles and resolved functions.
///
/// # Safety
/// `required_functions` must be null or point to `GetRequiredFunctionCount()`
/// function pointers in `GetRequiredFunctionNames()` order. `core` and
/// `plugin_manager` must stay valid for the rest of the process.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn PluginLoaded(
    core: *mut c_void,
    plugin_manager: *mut c_void,
    required_functions: *mut *mut c_void,
) {
    init_logging();

    // SAFETY: forwarded from the caller.
    let functions = match unsafe { HostFunctions::resolve(required_functions) } {
        Ok(functions) => functions,
        Err(e) => {
            error!("Button-to-touch disabled: {}", e);
            return;
        }
    };

    let host = FfiHost {
        core,
        plugin_manager,
        functions,
    };
    PLUGIN.with_borrow_mut(|plugin| {
        if plugin.is_some() {
            warn!("PluginLoaded called again, replacing plugin state");
        }
        *plugin = Some(PluginContext::new(host));
    });
    info!("Button-to-touch plugin loaded");
}

#[unsafe(no_mangle)]
pub extern "C" fn InitialSettingsOpening() {
    with_plugin("InitialSettingsOpening", |plugin| {
        plugin.initial_settings_opening()
    });
}

#[unsafe(no_mangle)]
pub extern "C" fn AfterSwapWindow() {
    with_plugin("AfterSwapWindow", |plugin| plugin.after_swap_window());
}
