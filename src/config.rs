//! Bridge configuration.
//!
//! The driver candidate list and the entry-point name/ordinal table are data,
//! not logic: the defaults below reproduce the stock XInput arrangement, and a
//! TOML file can override them.
//!
//! # Example
//! ```toml
//! log_filter = "padbridge=debug"
//!
//! [driver]
//! candidates = ["xinput1_4.dll", "xinput9_1_0.dll"]
//!
//! [driver.entry_points]
//! get_state = "XInputGetState"   # by name
//! set_state = "XInputSetState"
//! get_battery_information = "XInputGetBatteryInformation"
//! ```
//!
//! An integer entry (e.g. `get_state = 100`) resolves by export ordinal.
//!
//! # Source
//! [`BridgeConfig::from_env`] reads the file named by `PADBRIDGE_CONFIG`;
//! defaults apply when it is unset.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PADBRIDGE_CONFIG";

/// Export ordinal of the state entry point that also reports the guide button.
pub const GET_STATE_ORDINAL: u16 = 100;

/// How an entry point is looked up in the driver library.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Symbol {
    /// Export ordinal.
    Ordinal(u16),
    /// Exported name.
    Name(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Ordinal(n) => write!(f, "#{n}"),
            Symbol::Name(name) => f.write_str(name),
        }
    }
}

impl From<u16> for Symbol {
    fn from(ordinal: u16) -> Self {
        Symbol::Ordinal(ordinal)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::Name(name.to_string())
    }
}

/// Name/ordinal pairing for the three driver entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPoints {
    pub get_state: Symbol,
    pub set_state: Symbol,
    pub get_battery_information: Symbol,
}

impl Default for EntryPoints {
    fn default() -> Self {
        Self {
            get_state: Symbol::Ordinal(GET_STATE_ORDINAL),
            set_state: "XInputSetState".into(),
            get_battery_information: "XInputGetBatteryInformation".into(),
        }
    }
}

/// Which libraries to try, in order, and what to resolve from them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub candidates: Vec<String>,
    pub entry_points: EntryPoints,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "xinput1_3.dll".to_string(),
                "xinput1_4.dll".to_string(),
                "xinput9_1_0.dll".to_string(),
            ],
            entry_points: EntryPoints::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// `tracing_subscriber::EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub driver: DriverConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            driver: DriverConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `PADBRIDGE_CONFIG` if set, otherwise defaults.
    ///
    /// A bad file is returned as an error rather than logged, since this
    /// normally runs before any subscriber exists; see
    /// [`logging::init_from_env`](crate::logging::init_from_env).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_path_var(std::env::var_os(CONFIG_ENV))
    }

    fn from_path_var(path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_stock_driver_layout() {
        let cfg = BridgeConfig::default();
        assert_eq!(
            cfg.driver.candidates,
            ["xinput1_3.dll", "xinput1_4.dll", "xinput9_1_0.dll"]
        );
        assert_eq!(cfg.driver.entry_points.get_state, Symbol::Ordinal(100));
        assert_eq!(
            cfg.driver.entry_points.set_state,
            Symbol::Name("XInputSetState".into())
        );
        assert_eq!(
            cfg.driver.entry_points.get_battery_information,
            Symbol::Name("XInputGetBatteryInformation".into())
        );
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let cfg = BridgeConfig::from_toml_str(
            r#"
            [driver]
            candidates = ["xinput1_4.dll"]

            [driver.entry_points]
            get_state = "XInputGetState"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.driver.candidates, ["xinput1_4.dll"]);
        assert_eq!(cfg.driver.entry_points.get_state, Symbol::from("XInputGetState"));
        assert_eq!(
            cfg.driver.entry_points.set_state,
            EntryPoints::default().set_state
        );
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn integer_entry_is_an_ordinal() {
        let cfg = BridgeConfig::from_toml_str(
            r#"
            [driver.entry_points]
            set_state = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.driver.entry_points.set_state, Symbol::Ordinal(3));
    }

    #[test]
    fn serialized_config_parses_back() {
        let cfg = BridgeConfig::default();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(BridgeConfig::from_toml_str("log_filter = 5").is_err());
        assert!(BridgeConfig::from_toml_str("[driver]\ncandidates = \"x.dll\"").is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter = \"padbridge=trace\"").unwrap();

        let cfg = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(cfg.log_filter, "padbridge=trace");
        assert_eq!(cfg.driver, DriverConfig::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match BridgeConfig::load(&path) {
            Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[driver").unwrap();

        let err = BridgeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn unset_path_var_is_default() {
        let cfg = BridgeConfig::from_path_var(None::<&Path>).unwrap();
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn bad_path_var_is_reported_not_swallowed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter = [").unwrap();

        let err = BridgeConfig::from_path_var(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::from_path_var(Some(dir.path().join("gone.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn symbol_display() {
        assert_eq!(Symbol::Ordinal(100).to_string(), "#100");
        assert_eq!(Symbol::from("XInputSetState").to_string(), "XInputSetState");
    }
}
