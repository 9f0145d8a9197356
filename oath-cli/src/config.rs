use oath_core::hotp::Digits;
use oath_core::totp::TotpParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Default parameters read from the `--config` file.
///
/// Secrets are never stored here; they always come from the command line.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// Step size, start offset and length used by `totp`.
    pub(crate) totp: TotpParams,
    /// Length used by `hotp` when `--digits` is omitted.
    pub(crate) hotp_digits: Digits,
}

/// Loads the configuration, falling back to defaults when the file is absent.
pub(crate) fn load_config(path: &Path) -> io::Result<CliConfig> {
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let config_str = fs::read_to_string(path)?;
    serde_json::from_str(&config_str).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes the configuration as pretty-printed JSON.
pub(crate) fn save_config(path: &Path, config: &CliConfig) -> io::Result<()> {
    let config_str = serde_json::to_string_pretty(config).map_err(io::Error::other)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, config_str)
}
