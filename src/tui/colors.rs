//! Colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Theme;

/// One colour scheme. Cards are drawn in three bands (upper, center, lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Text and border colour
    pub buttons: Color,
    pub background: Color,
    /// Column headers, popups
    pub foreground: Color,
    /// Destructive actions
    pub red: Color,
    /// Completed cards, claimed rewards
    pub green: Color,
    pub label_lower: Color,
    pub label_center: Color,
    pub label_upper: Color,
}

pub const DARK: Palette = Palette {
    buttons: Color::Rgb(0xff, 0xff, 0xff),
    background: Color::Rgb(0x30, 0x31, 0x38),
    foreground: Color::Rgb(0x3c, 0x4a, 0x4a),
    red: Color::Rgb(0xe6, 0x27, 0x63),
    green: Color::Rgb(0x60, 0xf0, 0x29),
    label_lower: Color::Rgb(0x0d, 0x4f, 0x42),
    label_center: Color::Rgb(0x28, 0x9c, 0x85),
    label_upper: Color::Rgb(0x28, 0x70, 0x62),
};

pub const LIGHT: Palette = Palette {
    buttons: Color::Rgb(0x22, 0x22, 0x22),
    background: Color::Rgb(0xe8, 0xe7, 0xc9),
    foreground: Color::Rgb(0xdb, 0xdb, 0xc3),
    red: Color::Rgb(0xe6, 0x27, 0x63),
    green: Color::Rgb(0x60, 0xf0, 0x29),
    label_lower: Color::Rgb(0xb0, 0x00, 0xe6),
    label_center: Color::Rgb(0xbb, 0x4f, 0xdb),
    label_upper: Color::Rgb(0xd3, 0x42, 0xff),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}
