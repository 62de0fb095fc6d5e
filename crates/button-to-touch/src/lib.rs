pub mod args;
pub mod config;
pub mod error;
pub mod ffi;
pub mod host;
pub mod mapper;
pub mod plugin;

// Re-export commonly used types
pub use args::Args;
pub use config::{ButtonConfig, default_config_path, load_configuration, normalize};
pub use error::{ConfigError, HostError};
pub use host::{DeviceId, DryRunHost, Host, HostCall};
pub use mapper::{ButtonMapping, TouchMapper, Transition};
pub use plugin::PluginContext;
