/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TEAL:        Self = Self { r: 0.200, g: 0.600, b: 0.659, a: 1.0 }; // #3399A8
    pub const GREEN:       Self = Self { r: 0.024, g: 0.831, b: 0.424, a: 1.0 }; // #06D46C
    pub const YELLOW:      Self = Self { r: 0.957, g: 0.906, b: 0.188, a: 1.0 }; // #F4E730
    pub const TRANSPARENT: Self = Self { r: 0.0,   g: 0.0,   b: 0.0,   a: 0.0 };

    /// Build a colour from a packed `0xRRGGBB` integer and an opacity.
    pub fn from_rgb(packed: u32, alpha: f32) -> Self {
        let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let packed = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::from_rgb(packed, 1.0)),
            8 => Some(Self::from_rgb(packed >> 8, (packed & 0xFF) as f32 / 255.0)),
            _ => None,
        }
    }

    /// Convert to an [`iced::Color`] for use on an Iced canvas.
    #[inline]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }
}
