use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 102, g: 217, b: 239 };
pub const ACCENT: Color = Color::TrueColor { r: 166, g: 226, b: 46 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const OPEN_PORT: Color = Color::Green;
