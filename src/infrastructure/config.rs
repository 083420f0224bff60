use crate::domain::error::PanelError;
use crate::domain::threshold::AlarmChannel;
use serde::Deserialize;
use thiserror::Error;

pub const MAX_INTERVAL_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("update interval {0} ms outside [0, 10000]")]
    IntervalOutOfRange(u64),

    #[error("alarm log capacity must be at least 1")]
    EmptyAlarmLog,

    #[error(transparent)]
    Band(#[from] PanelError),
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub panel: PanelSettings,
    pub transport: TransportSettings,
    pub thresholds: ThresholdSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PanelSettings {
    pub update_interval_ms: u64,
    pub auto_update: bool,
    pub simulation: bool,
    /// Restart plot x coordinates at 0 after a clear.
    pub clear_resets_sequence: bool,
    pub alarm_log_capacity: usize,
    pub seed: Option<u64>,
    pub output: OutputFormat,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            update_interval_ms: 500,
            auto_update: false,
            simulation: true,
            clear_resets_sequence: false,
            alarm_log_capacity: 500,
            seed: None,
            output: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TransportSettings {
    pub port: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            port: "/dev/ttyS1".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThresholdSettings {
    pub temperature: BandConfig,
    pub humidity: BandConfig,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            temperature: BandConfig {
                enabled: false,
                lower: 20,
                upper: 30,
            },
            humidity: BandConfig {
                enabled: false,
                lower: 50,
                upper: 90,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BandConfig {
    #[serde(default)]
    pub enabled: bool,
    pub lower: i32,
    pub upper: i32,
}

impl PanelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_interval(self.panel.update_interval_ms)?;
        if self.panel.alarm_log_capacity == 0 {
            return Err(ConfigError::EmptyAlarmLog);
        }

        for (channel, band) in [
            (AlarmChannel::Temperature, &self.thresholds.temperature),
            (AlarmChannel::Humidity, &self.thresholds.humidity),
        ] {
            channel.check_bound(band.lower)?;
            channel.check_bound(band.upper)?;
        }
        Ok(())
    }
}

pub fn check_interval(ms: u64) -> Result<u64, ConfigError> {
    if ms > MAX_INTERVAL_MS {
        return Err(ConfigError::IntervalOutOfRange(ms));
    }
    Ok(ms)
}

/// `config/panel.*` if present, then `WEATHER_*` environment overrides
/// (e.g. `WEATHER_PANEL__AUTO_UPDATE=true`).
pub fn load_panel_config() -> anyhow::Result<PanelConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/panel").required(false))
        .add_source(
            config::Environment::with_prefix("WEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: PanelConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
