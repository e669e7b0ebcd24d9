use std::path::PathBuf;

use clap::Parser;

use crate::config::{AppConfig, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "stopwatch", version, about = "Terminal UI with any number of stopwatches")]
pub struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of stopwatches to start with
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Start in light or dark mode
    #[arg(short, long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Readout refreshes per second
    #[arg(long)]
    pub tick_rate: Option<f64>,
}

impl Args {
    /// Apply command line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(count) = self.count {
            config.stopwatches.initial = count;
        }
        if let Some(mode) = self.theme {
            config.theme.mode = mode;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.timing.tick_rate = tick_rate;
        }
    }
}
