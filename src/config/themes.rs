use ratatui::style::Color;

use super::ThemeName;

/// Colours the renderer pulls from the configured theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub tag: Color,
    pub muted: Color,
    pub warning: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Dark => Self {
                accent: Color::Cyan,
                highlight_fg: Color::Black,
                highlight_bg: Color::Blue,
                tag: Color::Green,
                muted: Color::Gray,
                warning: Color::Yellow,
            },
            ThemeName::Light => Self {
                accent: Color::Blue,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
                tag: Color::Magenta,
                muted: Color::DarkGray,
                warning: Color::Red,
            },
            ThemeName::HighContrast => Self {
                accent: Color::White,
                highlight_fg: Color::Black,
                highlight_bg: Color::Yellow,
                tag: Color::LightGreen,
                muted: Color::White,
                warning: Color::LightRed,
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(ThemeName::default())
    }
}
