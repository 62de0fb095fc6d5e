//! Plugin state and host hooks.
//!
//! [`PluginContext`] owns everything the plugin keeps between host calls: the
//! host adapter and the touch mapper. Each host hook maps to one method.

use crate::config;
use crate::host::Host;
use crate::mapper::TouchMapper;
use std::path::Path;
use tracing::{error, info, warn};

pub struct PluginContext<H: Host> {
    host: H,
    mapper: TouchMapper<H::Device>,
    loaded: bool,
}

impl<H: Host> PluginContext<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            mapper: TouchMapper::default(),
            loaded: false,
        }
    }

    /// Load button mappings from `path`.
    ///
    /// Only the first call has any effect. Configuration errors are logged and
    /// leave the plugin with no mappings; they never reach the host.
    pub fn load_configuration(&mut self, path: &Path) {
        if self.loaded {
            warn!("Button-to-touch configuration already loaded, ignoring reload");
            return;
        }
        self.loaded = true;

        match config::load_configuration(path, &mut self.host) {
            Ok(buttons) => self.mapper = TouchMapper::new(buttons),
            Err(e) => {
                error!("Button-to-touch configuration ignored: {}", e);
            }
        }
    }

    /// Settings-opening hook: load the configuration next to the executable
    pub fn initial_settings_opening(&mut self) {
        match config::default_config_path() {
            Ok(path) => {
                info!("Loading button-to-touch configuration from {:?}", path);
                self.load_configuration(&path);
            }
            Err(e) => {
                self.loaded = true;
                error!("Button-to-touch configuration ignored: {}", e);
            }
        }
    }

    /// Post-frame hook: forward button edges to the host
    pub fn after_swap_window(&mut self) -> usize {
        self.mapper.poll(&mut self.host)
    }

    pub fn mapper(&self) -> &TouchMapper<H::Device> {
        &self.mapper
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether a configuration load has been attempted
    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DeviceId, DryRunHost, HostCall};

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "button-to-touch-plugin-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn malformed_configuration_leaves_no_mappings() {
        let path = temp_config("malformed", "not json");
        let mut plugin = PluginContext::new(DryRunHost::new());

        plugin.load_configuration(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(plugin.is_loaded());
        assert!(plugin.mapper().is_empty());
        assert_eq!(plugin.host().device_count(), 0);
        assert_eq!(plugin.after_swap_window(), 0);
    }

    #[test]
    fn device_failure_midway_leaves_no_mappings() {
        let path = temp_config(
            "device-failure",
            r#"[{ "params": "a", "x": 319, "y": 239 }, { "params": "b", "x": 0, "y": 0 }]"#,
        );
        let mut host = DryRunHost::new();
        host.reject_params("b");
        let mut plugin = PluginContext::new(host);

        plugin.load_configuration(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(plugin.mapper().is_empty());
        plugin.host_mut().set_button_state(DeviceId(0), true);
        plugin.host_mut().take_calls();
        assert_eq!(plugin.after_swap_window(), 0);
        assert!(plugin.host().calls().is_empty());
    }

    #[test]
    fn second_load_creates_no_devices() {
        let path = temp_config("reload", r#"[{ "params": "a", "x": 319, "y": 239 }]"#);
        let mut plugin = PluginContext::new(DryRunHost::new());

        plugin.load_configuration(&path);
        plugin.load_configuration(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(plugin.mapper().len(), 1);
        assert_eq!(plugin.host().device_count(), 1);
    }

    #[test]
    fn frames_before_load_do_nothing() {
        let mut plugin = PluginContext::new(DryRunHost::new());

        assert_eq!(plugin.after_swap_window(), 0);
        assert!(plugin.host().calls().is_empty());
    }

    #[test]
    fn frames_drive_the_mapper() {
        let path = temp_config("frames", r#"[{ "params": "a", "x": 319, "y": 0 }]"#);
        let mut plugin = PluginContext::new(DryRunHost::new());
        plugin.load_configuration(&path);
        std::fs::remove_file(&path).unwrap();
        plugin.host_mut().take_calls();

        plugin.host_mut().set_button_state(DeviceId(0), true);
        assert_eq!(plugin.after_swap_window(), 1);
        assert_eq!(plugin.after_swap_window(), 0);
        plugin.host_mut().set_button_state(DeviceId(0), false);
        assert_eq!(plugin.after_swap_window(), 1);

        assert_eq!(
            plugin.host().calls(),
            &[
                HostCall::SetCustomTouchState {
                    x: 1.0,
                    y: 0.0,
                    pressed: true
                },
                HostCall::UseRealTouchState,
            ]
        );
    }
}
