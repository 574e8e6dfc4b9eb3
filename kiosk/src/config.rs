//! Storefront configuration.
//!
//! Configuration merges three layers, lowest precedence first: built-in
//! defaults, an optional YAML file at `{data_dir}/config.yaml`, and
//! `KIOSK_*` environment variables.

use std::env;
use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default hold window: five minutes.
pub const DEFAULT_HOLD_WINDOW_SECS: u64 = 300;

/// Default booking deposit amount.
pub const DEFAULT_DEPOSIT: u32 = 5000;

/// Default currency label for the deposit.
pub const DEFAULT_CURRENCY: &str = "PKR";

/// Resolved storefront configuration.
///
/// # Examples
///
/// ```
/// use kiosk::Config;
///
/// let config = Config::default();
/// assert_eq!(config.hold_window_secs, 300);
/// assert_eq!(config.deposit, 5000);
/// assert_eq!(config.currency, "PKR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How long a booking hold stays live, in seconds.
    pub hold_window_secs: u64,
    /// The deposit a buyer must pay within the hold window.
    pub deposit: u32,
    /// The currency label shown alongside the deposit.
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hold_window_secs: DEFAULT_HOLD_WINDOW_SECS,
            deposit: DEFAULT_DEPOSIT,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Config {
    /// Returns the hold window as a duration.
    ///
    /// # Panics
    ///
    /// Panics if the window exceeds `i64::MAX` milliseconds, which the
    /// builder's validation rules out.
    #[must_use]
    pub fn hold_window(&self) -> Duration {
        #[allow(clippy::cast_possible_wrap)]
        Duration::seconds(self.hold_window_secs as i64)
    }

    /// Starts a configuration builder with built-in defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// The shape of a configuration file. Every field is optional; unset
/// fields fall through to the layer below.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    hold_window_secs: Option<u64>,
    deposit: Option<u32>,
    currency: Option<String>,
}

/// Builder that merges configuration layers in precedence order.
///
/// # Examples
///
/// ```
/// use kiosk::config::ConfigBuilder;
///
/// let config = ConfigBuilder::default()
///     .hold_window_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.hold_window_secs, 60);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    hold_window_secs: Option<u64>,
    deposit: Option<u32>,
    currency: Option<String>,
}

impl ConfigBuilder {
    /// Sets the hold window in seconds.
    #[must_use]
    pub const fn hold_window_secs(mut self, secs: u64) -> Self {
        self.hold_window_secs = Some(secs);
        self
    }

    /// Sets the deposit amount.
    #[must_use]
    pub const fn deposit(mut self, deposit: u32) -> Self {
        self.deposit = Some(deposit);
        self
    }

    /// Sets the currency label.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Merges values from a YAML configuration file, if it exists.
    ///
    /// A missing file is not an error; a present but unparseable file is.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn merge_file(mut self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(self);
        }
        let contents = fs::read_to_string(path)?;
        let file: ConfigFile = serde_yaml::from_str(&contents)?;
        if let Some(secs) = file.hold_window_secs {
            self.hold_window_secs = Some(secs);
        }
        if let Some(deposit) = file.deposit {
            self.deposit = Some(deposit);
        }
        if let Some(currency) = file.currency {
            self.currency = Some(currency);
        }
        Ok(self)
    }

    /// Applies `KIOSK_*` environment variable overrides.
    ///
    /// Recognized variables: `KIOSK_HOLD_WINDOW_SECS`, `KIOSK_DEPOSIT`,
    /// `KIOSK_CURRENCY`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a set variable fails to parse.
    pub fn merge_env(mut self) -> Result<Self> {
        if let Ok(secs) = env::var("KIOSK_HOLD_WINDOW_SECS") {
            self.hold_window_secs = Some(secs.parse().map_err(|_| Error::Validation {
                field: "KIOSK_HOLD_WINDOW_SECS".into(),
                message: "must be a non-negative integer".into(),
            })?);
        }
        if let Ok(deposit) = env::var("KIOSK_DEPOSIT") {
            self.deposit = Some(deposit.parse().map_err(|_| Error::Validation {
                field: "KIOSK_DEPOSIT".into(),
                message: "must be a non-negative integer".into(),
            })?);
        }
        if let Ok(currency) = env::var("KIOSK_CURRENCY") {
            self.currency = Some(currency);
        }
        Ok(self)
    }

    /// Builds the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the hold window is zero or the
    /// currency label is empty.
    pub fn build(self) -> Result<Config> {
        let hold_window_secs = self.hold_window_secs.unwrap_or(DEFAULT_HOLD_WINDOW_SECS);
        if hold_window_secs == 0 {
            return Err(Error::Validation {
                field: "hold_window_secs".into(),
                message: "hold window must be at least one second".into(),
            });
        }
        // chrono::Duration::seconds panics past i64::MAX milliseconds.
        if hold_window_secs > i64::MAX as u64 / 1000 {
            return Err(Error::Validation {
                field: "hold_window_secs".into(),
                message: "hold window is out of range".into(),
            });
        }

        let currency = self.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if currency.trim().is_empty() {
            return Err(Error::Validation {
                field: "currency".into(),
                message: "currency must be non-empty after trimming whitespace".into(),
            });
        }

        Ok(Config {
            hold_window_secs,
            deposit: self.deposit.unwrap_or(DEFAULT_DEPOSIT),
            currency,
        })
    }
}

/// Loads configuration from the data directory's `config.yaml` plus
/// environment overrides.
///
/// # Errors
///
/// Returns an error if the file exists but is invalid, an environment
/// variable fails to parse, or the merged values fail validation.
pub fn load_config(data_dir: &Path) -> Result<Config> {
    Config::builder()
        .merge_file(&data_dir.join("config.yaml"))?
        .merge_env()?
        .build()
}
