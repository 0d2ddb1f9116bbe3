pub mod colors;

pub use colors::Color;

use dial_config::ThemeConfig;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA
/// with the configured opacity already applied.  Calling
/// [`Theme::from_config`] is infallible; invalid or missing colours fall
/// back to the stock palette.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Colour of the translucent gauge tracks.
    pub background: Color,
    /// Gauge colours: cpu, net up, battery, temp, net down, ram.
    pub foreground: [Color; 6],
    /// Clock label colours: primary, secondary.
    pub text:       [Color; 2],
    /// Size of the largest clock label; the others scale from it.
    pub font_size:  f32,
}

const STOCK_FOREGROUND: [Color; 6] = [
    Color::TEAL,
    Color::TEAL,
    Color::GREEN,
    Color::GREEN,
    Color::YELLOW,
    Color::TEAL,
];

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        let fg_alpha = cfg.foreground_alpha;
        let pick = |list: &[String], i: usize, fallback: Color| {
            list.get(i)
                .map_or(fallback, |hex| parse_or(hex, fallback))
                .with_alpha(fg_alpha)
        };

        Self {
            background: parse_or(&cfg.background, Color::TEAL).with_alpha(cfg.background_alpha),
            foreground: std::array::from_fn(|i| pick(&cfg.foreground, i, STOCK_FOREGROUND[i])),
            text: [
                pick(&cfg.text, 0, Color::TEAL),
                pick(&cfg.text, 1, Color::GREEN),
            ],
            font_size: cfg.font_size,
        }
    }
}

/// Parse `hex`, warning and substituting `fallback` when it is invalid.
fn parse_or(hex: &str, fallback: Color) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        tracing::warn!("Ignoring invalid theme colour '{hex}'");
        fallback
    })
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_is_applied_to_every_colour() {
        let theme = Theme::default();
        assert!((theme.background.a - 0.1).abs() < 1e-6);
        assert!(theme.foreground.iter().all(|c| (c.a - 0.8).abs() < 1e-6));
        assert!(theme.text.iter().all(|c| (c.a - 0.8).abs() < 1e-6));
    }

    #[test]
    fn short_palettes_fall_back_to_stock() {
        let cfg = ThemeConfig {
            foreground: vec!["#ff0000".to_string(), "nonsense".to_string()],
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.foreground[0], Color::from_rgb(0xFF0000, 0.8));
        assert_eq!(theme.foreground[1], Color::TEAL.with_alpha(0.8));
        assert_eq!(theme.foreground[4], Color::YELLOW.with_alpha(0.8));
    }

    #[test]
    fn invalid_background_falls_back_like_the_palette() {
        let cfg = ThemeConfig {
            background: "#12345".to_string(),
            background_alpha: 0.3,
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.background, Color::TEAL.with_alpha(0.3));
        assert_eq!(parse_or("#12345", Color::GREEN), Color::GREEN);
        assert_eq!(parse_or("#ff0000", Color::GREEN), Color::from_rgb(0xFF0000, 1.0));
    }
}
