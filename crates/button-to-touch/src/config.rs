//! Button-to-touch configuration loading.
//!
//! The configuration lives next to the emulator executable as
//! `button-to-touch.json`:
//!
//! ```json
//! [
//!     { "params": "engine:keyboard,code:65", "x": 319, "y": 0 },
//!     { "params": "engine:keyboard,code:66", "x": 0, "y": 239 }
//! ]
//! ```
//!
//! `params` is handed to the host's button-device factory untouched. `x` and
//! `y` are bottom-screen pixel positions, normalized against the last
//! addressable pixel (319 × 239) with integer division. That truncates every
//! position to 0 or 1 inside the screen, which is what vvctre has always
//! received from this mapping, so the arithmetic is kept as is.

use crate::error::ConfigError;
use crate::host::Host;
use crate::mapper::ButtonMapping;
use n3ds_hw::specs::touch;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the executable directory
pub const CONFIG_FILE_NAME: &str = "button-to-touch.json";

/// One element of the configuration array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ButtonConfig {
    /// Opaque device-construction params passed through to the host
    pub params: String,
    /// Bottom-screen pixel X
    pub x: i32,
    /// Bottom-screen pixel Y
    pub y: i32,
}

impl ButtonConfig {
    /// Normalized touch position for this entry
    pub fn touch_position(&self) -> (f32, f32) {
        normalize(self.x, self.y)
    }
}

/// Normalize a pixel position with truncating integer division
pub fn normalize(x_pixel: i32, y_pixel: i32) -> (f32, f32) {
    (
        (x_pixel / touch::X_DIVISOR) as f32,
        (y_pixel / touch::Y_DIVISOR) as f32,
    )
}

/// `<executable-directory>/button-to-touch.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ExecutableDir)?;
    let dir = exe.parent().ok_or_else(|| {
        ConfigError::ExecutableDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// UTF-8 byte-order mark written by some Windows editors
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse and validate a configuration document.
///
/// A leading UTF-8 byte-order mark is skipped. `path` is only used for error
/// reporting.
pub fn parse_configuration(bytes: &[u8], path: &Path) -> Result<Vec<ButtonConfig>, ConfigError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let entries: Vec<ButtonConfig> =
        serde_json::from_slice(bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(index) = entries.iter().position(|e| e.params.contains('\0')) {
        return Err(ConfigError::InvalidParams { index });
    }

    Ok(entries)
}

/// Load the configuration at `path` and create one host device per entry.
///
/// A file that can't be opened means nothing is configured and yields an empty
/// list. The document is fully validated before the first device is created,
/// so an error never leaves devices behind for a partial list.
pub fn load_configuration<H: Host>(
    path: &Path,
    host: &mut H,
) -> Result<Vec<ButtonMapping<H::Device>>, ConfigError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            info!("No button-to-touch configuration at {:?} ({})", path, e);
            return Ok(Vec::new());
        }
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_configuration(&bytes, path)?;
    debug!("Parsed {} button entries from {:?}", entries.len(), path);

    let mut buttons = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let device = host
            .new_button_device(&entry.params)
            .map_err(|source| ConfigError::Device { index, source })?;
        let (x, y) = entry.touch_position();
        debug!(
            "Button {}: params={:?} pixel=({}, {}) touch=({}, {})",
            index, entry.params, entry.x, entry.y, x, y
        );
        buttons.push(ButtonMapping::new(device, x, y));
    }

    info!("Loaded {} button-to-touch mappings", buttons.len());
    Ok(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::{DeviceId, DryRunHost, HostCall};

    fn temp_config(name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "button-to-touch-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn normalize_divides_x_by_319_and_y_by_239() {
        assert_eq!(normalize(0, 0), (0.0, 0.0));
        assert_eq!(normalize(319, 239), (1.0, 1.0));
        assert_eq!(normalize(239, 319), (0.0, 1.0));
        assert_eq!(normalize(318, 238), (0.0, 0.0));
        assert_eq!(normalize(638, 478), (2.0, 2.0));
    }

    #[test]
    fn normalize_truncates_toward_zero() {
        assert_eq!(normalize(-318, -238), (0.0, 0.0));
        assert_eq!(normalize(-319, -239), (-1.0, -1.0));
    }

    #[test]
    fn parse_keeps_array_order_and_ignores_unknown_fields() {
        let entries = parse_configuration(
            br#"[
                { "params": "a", "x": 1, "y": 2, "comment": "left" },
                { "params": "b", "x": 319, "y": 239 }
            ]"#,
            Path::new("test.json"),
        )
        .unwrap();

        assert_eq!(
            entries,
            vec![
                ButtonConfig {
                    params: "a".to_string(),
                    x: 1,
                    y: 2
                },
                ButtonConfig {
                    params: "b".to_string(),
                    x: 319,
                    y: 239
                },
            ]
        );
    }

    #[test]
    fn parse_rejects_malformed_documents() {
        let path = Path::new("test.json");
        for text in [
            "",
            "[",
            r#"{ "params": "a", "x": 1, "y": 2 }"#,
            r#"[{ "x": 1, "y": 2 }]"#,
            r#"[{ "params": "a", "y": 2 }]"#,
            r#"[{ "params": 5, "x": 1, "y": 2 }]"#,
            r#"[{ "params": "a", "x": "1", "y": 2 }]"#,
            r#"[{ "params": "a", "x": 1.5, "y": 2 }]"#,
            r#"[{ "params": "a", "x": 1, "y": 4294967296 }]"#,
        ] {
            assert!(
                matches!(
                    parse_configuration(text.as_bytes(), path),
                    Err(ConfigError::Parse { .. })
                ),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_nul_in_params() {
        let result = parse_configuration(
            br#"[{ "params": "ok", "x": 0, "y": 0 }, { "params": "a\u0000b", "x": 0, "y": 0 }]"#,
            Path::new("test.json"),
        );
        assert!(matches!(result, Err(ConfigError::InvalidParams { index: 1 })));
    }

    #[test]
    fn load_creates_one_device_per_entry_in_order() {
        let path = temp_config(
            "order",
            r#"[
                { "params": "engine:keyboard,code:65", "x": 319, "y": 0 },
                { "params": "engine:keyboard,code:66", "x": 0, "y": 239 },
                { "params": "engine:keyboard,code:67", "x": 100, "y": 100 }
            ]"#,
        );
        let mut host = DryRunHost::new();

        let buttons = load_configuration(&path, &mut host).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(buttons.len(), 3);
        assert_eq!(
            buttons
                .iter()
                .map(|b| (b.device, b.x, b.y, b.pressed))
                .collect::<Vec<_>>(),
            vec![
                (DeviceId(0), 1.0, 0.0, false),
                (DeviceId(1), 0.0, 1.0, false),
                (DeviceId(2), 0.0, 0.0, false),
            ]
        );
        assert_eq!(
            host.calls(),
            &[
                HostCall::NewButtonDevice {
                    params: "engine:keyboard,code:65".to_string()
                },
                HostCall::NewButtonDevice {
                    params: "engine:keyboard,code:66".to_string()
                },
                HostCall::NewButtonDevice {
                    params: "engine:keyboard,code:67".to_string()
                },
            ]
        );
    }

    #[test]
    fn load_skips_utf8_byte_order_mark() {
        let path = temp_config(
            "bom",
            "\u{feff}[{ \"params\": \"engine:keyboard,code:65\", \"x\": 319, \"y\": 0 }]",
        );
        let mut host = DryRunHost::new();

        let buttons = load_configuration(&path, &mut host).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(buttons.len(), 1);
        assert_eq!((buttons[0].x, buttons[0].y), (1.0, 0.0));
        assert_eq!(host.device_params(DeviceId(0)), Some("engine:keyboard,code:65"));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let path = temp_config(
            "invalid-utf8",
            b"[{ \"params\": \"\xff\", \"x\": 0, \"y\": 0 }]",
        );
        let mut host = DryRunHost::new();

        let result = load_configuration(&path, &mut host);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        assert_eq!(host.device_count(), 0);
    }

    #[test]
    fn missing_file_is_empty_without_device_calls() {
        let path = std::env::temp_dir().join("button-to-touch-does-not-exist.json");
        let mut host = DryRunHost::new();

        let buttons = load_configuration(&path, &mut host).unwrap();

        assert!(buttons.is_empty());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn malformed_file_creates_no_devices() {
        let path = temp_config(
            "malformed",
            r#"[{ "params": "a", "x": 1, "y": 2 }, { "params": "b", "x": 1 }]"#,
        );
        let mut host = DryRunHost::new();

        let result = load_configuration(&path, &mut host);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        assert_eq!(host.device_count(), 0);
    }

    #[test]
    fn empty_array_loads_nothing() {
        let path = temp_config("empty", "[]");
        let mut host = DryRunHost::new();

        let buttons = load_configuration(&path, &mut host).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(buttons.is_empty());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn device_failure_reports_entry_index() {
        let path = temp_config(
            "device-failure",
            r#"[{ "params": "a", "x": 0, "y": 0 }, { "params": "b", "x": 319, "y": 239 }]"#,
        );
        let mut host = DryRunHost::new();
        host.reject_params("b");

        let result = load_configuration(&path, &mut host);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(ConfigError::Device {
                index: 1,
                source: HostError::NullDevice { .. }
            })
        ));
    }

    #[test]
    fn default_path_is_next_to_executable() {
        let path = default_config_path().unwrap();
        let exe = std::env::current_exe().unwrap();

        assert_eq!(path.parent(), exe.parent());
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }
}
