use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "stopwatch-tui";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// and a missing file falls back to defaults.
pub fn load(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_from(path);
    }

    let Some(path) = config_path() else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(?path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_from(&path)
}

fn load_from(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse(&content)
        .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
    debug!(?path, "Loaded config");
    Ok(config)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::config::ThemeMode;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.stopwatches.initial, 3);
        assert!((config.timing.tick_rate - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.theme.mode, ThemeMode::Dark);
        assert_eq!(config.header.title, "Stopwatch");
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse(
            r#"
            [theme]
            mode = "light"

            [stopwatches]
            initial = 5

            [keybindings.stopwatch]
            reset = ["Backspace", "0"]
            "#,
        )
        .unwrap();

        assert_eq!(config.theme.mode, ThemeMode::Light);
        assert_eq!(config.theme.dark, "Catppuccin Mocha");
        assert_eq!(config.stopwatches.initial, 5);

        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        assert!(config.keybindings.stopwatch.reset.matches(&backspace));
        let start = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(config.keybindings.stopwatch.start.matches(&start));
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        assert!(parse("[timing]\ntick_rate = 0.0").is_err());
        assert!(parse("[timing]\nframe_rate = -1.0").is_err());
    }

    #[test]
    fn test_rate_without_timer_period_is_rejected() {
        // Period rounds to zero nanoseconds.
        assert!(parse("[timing]\ntick_rate = 1e10").is_err());
        // Period overflows.
        assert!(parse("[timing]\nframe_rate = 1e-320").is_err());
        assert!(parse("[timing]\ntick_rate = 1000.0").is_ok());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(parse("[keybindings.global]\nquit = \"hyper+q\"").is_err());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let result = load(Some(Path::new("/definitely/not/here/config.toml")));
        assert!(result.is_err());
    }
}
