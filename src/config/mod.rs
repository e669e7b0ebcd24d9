pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::*;
use clap::ValueEnum;
use color_eyre::eyre::{Result, eyre};
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme used in dark mode.
    pub dark: String,
    /// Theme used in light mode.
    pub light: String,
    /// Mode the app starts in.
    pub mode: ThemeMode,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark: "Catppuccin Mocha".to_string(),
            light: "Catppuccin Latte".to_string(),
            mode: ThemeMode::Dark,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Readout refreshes per second.
    pub tick_rate: f64,
    /// Upper bound on redraws per second.
    pub frame_rate: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            frame_rate: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub title: String,
    pub subtitle: String,
    pub show_clock: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: "Stopwatch".to_string(),
            subtitle: "As per textual tutorial".to_string(),
            show_clock: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwatchConfig {
    /// Number of stopwatches shown at startup.
    pub initial: usize,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self { initial: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub stopwatches: StopwatchConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// Interval between beats for `rate` per second, if it is a usable timer
/// period: representable and at least one nanosecond.
pub fn rate_period(rate: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(rate.recip())
        .ok()
        .filter(|period| !period.is_zero())
}

impl AppConfig {
    /// Reject values the event loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("timing.tick_rate", self.timing.tick_rate),
            ("timing.frame_rate", self.timing.frame_rate),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(eyre!("{name} must be a positive number, got {rate}"));
            }
            if rate_period(rate).is_none() {
                return Err(eyre!("{name} is out of range, got {rate}"));
            }
        }
        Ok(())
    }
}
