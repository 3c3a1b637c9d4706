//! RGBA colors and the Miro color vocabulary.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    /// Parse a hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`) or a named Miro
    /// sticky-note color.
    pub fn parse(value: &str) -> Option<Color> {
        let value = value.trim();
        match value.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => named(&value.to_ascii_lowercase()),
        }
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::rgb(digits.next()??, digits.next()??, digits.next()??))
        }
        6 => Some(Color::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        8 => Some(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

fn named(name: &str) -> Option<Color> {
    let color = match name {
        "transparent" | "none" => Color::TRANSPARENT,
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "gray" => Color::rgb(0xe6, 0xe6, 0xe6),
        "light_yellow" => Color::rgb(0xff, 0xf9, 0xb1),
        "yellow" => Color::rgb(0xf5, 0xd1, 0x28),
        "orange" => Color::rgb(0xff, 0x9d, 0x48),
        "light_green" => Color::rgb(0xd5, 0xf6, 0x92),
        "green" => Color::rgb(0xc9, 0xdf, 0x56),
        "dark_green" => Color::rgb(0x93, 0xd2, 0x75),
        "cyan" => Color::rgb(0x67, 0xc6, 0xc0),
        "light_pink" => Color::rgb(0xff, 0xce, 0xe0),
        "pink" => Color::rgb(0xea, 0x94, 0xbb),
        "violet" => Color::rgb(0xc6, 0xa2, 0xd2),
        "red" => Color::rgb(0xf0, 0x93, 0x9d),
        "light_blue" => Color::rgb(0xa6, 0xcc, 0xf5),
        "blue" => Color::rgb(0x6c, 0xd8, 0xfa),
        "dark_blue" => Color::rgb(0x9e, 0xa9, 0xff),
        _ => return None,
    };
    Some(color)
}
