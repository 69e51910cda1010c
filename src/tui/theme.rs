use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub marked: Color,
    pub locked: Color,
    pub insertion: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x41, 0x96, 0xFB),
            dim: Color::Rgb(0x70, 0x70, 0x88),
            marked: Color::Rgb(0x44, 0xFF, 0x88),
            locked: Color::Rgb(0xFF, 0xD7, 0x00),
            insertion: Color::Rgb(0xFB, 0x41, 0x96),
            error: Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from config, falling back to defaults for any
    /// missing or unparseable entry
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match name.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "marked" => theme.marked = color,
                "locked" => theme.locked = color,
                "insertion" => theme.insertion = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        theme
    }
}
