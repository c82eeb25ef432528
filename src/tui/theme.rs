use ratatui::style::Color;

use crate::model::UiConfig;
use crate::model::activity::LogLevel;

/// Colors used by the TUI. Every slot can be overridden from `[ui.colors]`
/// by its field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Cursor, active borders, the app name
    pub highlight: Color,
    pub dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x14, 0x16, 0x1E),
            text: Color::Rgb(0xC8, 0xCC, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xF2, 0xA2, 0x3A),
            dim: Color::Rgb(0x6B, 0x71, 0x85),
            success: Color::Rgb(0x6C, 0xD0, 0x8C),
            warning: Color::Rgb(0xE8, 0xC5, 0x4A),
            error: Color::Rgb(0xF0, 0x5E, 0x5E),
            selection_bg: Color::Rgb(0x2E, 0x34, 0x4A),
            search_match_bg: Color::Rgb(0xF2, 0xA2, 0x3A),
            search_match_fg: Color::Rgb(0x14, 0x16, 0x1E),
        }
    }
}

/// `#RRGGBB` to an RGB color
fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

impl Theme {
    fn slot_mut(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "success" => &mut self.success,
            "warning" => &mut self.warning,
            "error" => &mut self.error,
            "selection_bg" => &mut self.selection_bg,
            "search_match_bg" => &mut self.search_match_bg,
            "search_match_fg" => &mut self.search_match_fg,
            _ => return None,
        })
    }

    /// Default theme with the `[ui.colors]` overrides applied.
    /// Unknown slots and malformed colors are logged and skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, value) in &ui.colors {
            match (theme.slot_mut(name), parse_hex_color(value)) {
                (Some(slot), Some(color)) => *slot = color,
                (None, _) => tracing::warn!(slot = %name, "unknown theme color"),
                (_, None) => tracing::warn!(slot = %name, value = %value, "ignoring invalid color"),
            }
        }
        theme
    }

    /// Color of an activity log line
    pub fn level_color(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Info => self.text,
            LogLevel::Success => self.success,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#F05E5E"), Some(Color::Rgb(0xF0, 0x5E, 0x5E)));
        assert_eq!(parse_hex_color("#000000"), Some(Color::Rgb(0, 0, 0)));
        assert_eq!(parse_hex_color("F05E5E"), None);
        assert_eq!(parse_hex_color("#F05E"), None);
        assert_eq!(parse_hex_color("#+F05E5"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn overrides_apply_by_slot_name() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("success".into(), "green".into());
        ui.colors.insert("sparkle".into(), "#FFFFFF".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.success, Theme::default().success);
        assert_eq!(
            Theme {
                background: Theme::default().background,
                ..theme
            },
            Theme::default()
        );
    }

    #[test]
    fn log_levels_map_to_slots() {
        let theme = Theme::default();
        assert_eq!(theme.level_color(LogLevel::Info), theme.text);
        assert_eq!(theme.level_color(LogLevel::Success), theme.success);
        assert_eq!(theme.level_color(LogLevel::Warning), theme.warning);
        assert_eq!(theme.level_color(LogLevel::Error), theme.error);
    }
}
