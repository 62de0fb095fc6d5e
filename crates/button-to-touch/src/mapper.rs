//! Button-to-touch mapping.
//!
//! Each configured button carries its own two-state machine (released or
//! pressed). Once per frame every button is compared against the state it had
//! at the previous poll and only edges reach the host: a press injects a
//! custom touch at the button's coordinates, a release hands the touchscreen
//! back to real input.
//!
//! The emulator exposes a single synthetic touch point. When several mapped
//! buttons go down in the same frame, the last one in configuration order
//! wins.

use crate::host::Host;
use tracing::trace;

/// Edge detected on a mapped button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Released -> Pressed
    Pressed,
    /// Pressed -> Released
    Released,
}

/// A host button device bound to a normalized touch position
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonMapping<D> {
    /// Host-owned device handle
    pub device: D,
    /// Normalized touch X
    pub x: f32,
    /// Normalized touch Y
    pub y: f32,
    /// State as of the last poll
    pub pressed: bool,
}

impl<D> ButtonMapping<D> {
    /// Create a mapping in the released state
    pub fn new(device: D, x: f32, y: f32) -> Self {
        Self {
            device,
            x,
            y,
            pressed: false,
        }
    }

    /// Record the current device state, returning the edge if it changed
    pub fn sync(&mut self, pressed: bool) -> Option<Transition> {
        match (self.pressed, pressed) {
            (false, true) => {
                self.pressed = true;
                Some(Transition::Pressed)
            }
            (true, false) => {
                self.pressed = false;
                Some(Transition::Released)
            }
            _ => None,
        }
    }
}

/// Ordered set of button mappings, fixed once loaded
#[derive(Debug)]
pub struct TouchMapper<D> {
    buttons: Vec<ButtonMapping<D>>,
}

impl<D> Default for TouchMapper<D> {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }
}

impl<D> TouchMapper<D> {
    pub fn new(buttons: Vec<ButtonMapping<D>>) -> Self {
        Self { buttons }
    }

    pub fn buttons(&self) -> &[ButtonMapping<D>] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Poll every button and forward edges to the host.
    ///
    /// Returns the number of transitions applied this frame.
    pub fn poll<H>(&mut self, host: &mut H) -> usize
    where
        H: Host<Device = D>,
    {
        let mut transitions = 0;

        for (index, button) in self.buttons.iter_mut().enumerate() {
            let pressed = host.button_device_state(&button.device);
            match button.sync(pressed) {
                Some(Transition::Pressed) => {
                    trace!(index, x = button.x, y = button.y, "button pressed");
                    host.set_custom_touch_state(button.x, button.y, true);
                    transitions += 1;
                }
                Some(Transition::Released) => {
                    trace!(index, "button released");
                    host.use_real_touch_state();
                    transitions += 1;
                }
                None => {}
            }
        }

        transitions
    }
}
