//! Host emulator interface.
//!
//! The plugin only needs four operations from vvctre: creating a button
//! device from a params string, reading a device's pressed state, injecting a
//! custom touch state, and handing touch input back to the real touchscreen.
//! [`Host`] abstracts over those so the mapping logic never touches raw
//! function pointers. The FFI adapter lives in [`crate::ffi`]; [`DryRunHost`]
//! is an in-process implementation used by the check tool and tests.

use crate::error::HostError;

/// Operations the plugin requires from the host emulator
pub trait Host {
    /// Opaque handle to a host-owned button device. Never freed by the plugin.
    type Device;

    /// Create a button device from opaque device-construction params
    fn new_button_device(&mut self, params: &str) -> Result<Self::Device, HostError>;

    /// Whether the device currently reads as pressed
    fn button_device_state(&self, device: &Self::Device) -> bool;

    /// Override the touchscreen with a synthetic touch at normalized `(x, y)`
    fn set_custom_touch_state(&mut self, x: f32, y: f32, pressed: bool);

    /// Restore the real touchscreen input
    fn use_real_touch_state(&mut self);
}

/// Device handle issued by [`DryRunHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub usize);

/// Side-effecting call recorded by [`DryRunHost`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    NewButtonDevice { params: String },
    SetCustomTouchState { x: f32, y: f32, pressed: bool },
    UseRealTouchState,
}

/// Host that runs without an emulator.
///
/// Devices are numbered in creation order and start released; their state is
/// scripted with [`DryRunHost::set_button_state`]. Params registered with
/// [`DryRunHost::reject_params`] fail like a host returning a null device.
#[derive(Debug, Default)]
pub struct DryRunHost {
    devices: Vec<DryRunDevice>,
    calls: Vec<HostCall>,
    rejected: Vec<String>,
}

#[derive(Debug)]
struct DryRunDevice {
    params: String,
    pressed: bool,
}

impl DryRunHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the pressed state of a previously created device
    pub fn set_button_state(&mut self, device: DeviceId, pressed: bool) {
        if let Some(dev) = self.devices.get_mut(device.0) {
            dev.pressed = pressed;
        }
    }

    /// Make device creation fail for `params`
    pub fn reject_params(&mut self, params: &str) {
        self.rejected.push(params.to_string());
    }

    /// Params string a device was created with
    pub fn device_params(&self, device: DeviceId) -> Option<&str> {
        self.devices.get(device.0).map(|dev| dev.params.as_str())
    }

    /// Number of devices created so far
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Host for DryRunHost {
    type Device = DeviceId;

    fn new_button_device(&mut self, params: &str) -> Result<DeviceId, HostError> {
        self.calls.push(HostCall::NewButtonDevice {
            params: params.to_string(),
        });
        if self.rejected.iter().any(|p| p == params) {
            return Err(HostError::NullDevice {
                params: params.to_string(),
            });
        }
        self.devices.push(DryRunDevice {
            params: params.to_string(),
            pressed: false,
        });
        Ok(DeviceId(self.devices.len() - 1))
    }

    fn button_device_state(&self, device: &DeviceId) -> bool {
        self.devices.get(device.0).is_some_and(|dev| dev.pressed)
    }

    fn set_custom_touch_state(&mut self, x: f32, y: f32, pressed: bool) {
        self.calls.push(HostCall::SetCustomTouchState { x, y, pressed });
    }

    fn use_real_touch_state(&mut self) {
        self.calls.push(HostCall::UseRealTouchState);
    }
}
