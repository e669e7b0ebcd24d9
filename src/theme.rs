use catppuccin::{Flavor, PALETTE};
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use tracing::warn;

use crate::config::{ThemeConfig, ThemeMode};

/// Palette slots the UI draws with, resolved from one Catppuccin flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub base: Color,
    pub mantle: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext0: Color,

    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub green: Color,
    pub blue: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

impl Theme {
    const fn from_flavor(flavor: &Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: rgb(&c.base),
            mantle: rgb(&c.mantle),
            surface0: rgb(&c.surface0),
            surface1: rgb(&c.surface1),
            overlay0: rgb(&c.overlay0),
            overlay1: rgb(&c.overlay1),
            text: rgb(&c.text),
            subtext0: rgb(&c.subtext0),
            mauve: rgb(&c.mauve),
            red: rgb(&c.red),
            peach: rgb(&c.peach),
            green: rgb(&c.green),
            blue: rgb(&c.blue),
            lavender: rgb(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    #[must_use]
    pub fn mocha() -> Self {
        Self::from_flavor(&PALETTE.mocha)
    }

    #[must_use]
    pub fn latte() -> Self {
        Self::from_flavor(&PALETTE.latte)
    }

    /// Look up a flavour by name, ignoring case. Accepts `mocha`,
    /// `Catppuccin Mocha` and the unaccented `frappe`.
    pub fn by_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        let short = lower.strip_prefix("catppuccin").unwrap_or(&lower).trim();
        match short {
            "mocha" => Some(Self::from_flavor(&PALETTE.mocha)),
            "macchiato" => Some(Self::from_flavor(&PALETTE.macchiato)),
            "frappé" | "frappe" => Some(Self::from_flavor(&PALETTE.frappe)),
            "latte" => Some(Self::from_flavor(&PALETTE.latte)),
            _ => None,
        }
    }

    // Semantic colors

    #[must_use]
    pub const fn primary(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn key_hint(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn highlight(&self) -> Color {
        self.mauve
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// The dark and light themes the app switches between.
#[derive(Debug, Clone, Copy)]
pub struct ThemePair {
    dark: Theme,
    light: Theme,
    mode: ThemeMode,
}

impl ThemePair {
    /// Unknown names fall back to Mocha for dark and Latte for light.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let resolve = |name: &str, fallback: fn() -> Theme| {
            Theme::by_name(name).unwrap_or_else(|| {
                warn!(name, "Unknown theme, using default");
                fallback()
            })
        };
        Self {
            dark: resolve(&config.dark, Theme::mocha),
            light: resolve(&config.light, Theme::latte),
            mode: config.mode,
        }
    }

    #[must_use]
    pub const fn current(&self) -> &Theme {
        match self.mode {
            ThemeMode::Dark => &self.dark,
            ThemeMode::Light => &self.light,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub const fn toggle(&mut self) {
        self.mode = self.mode.toggled();
    }
}
