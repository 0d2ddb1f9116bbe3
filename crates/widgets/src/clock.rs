use chrono::{DateTime, Datelike, TimeZone};
use dial_theme::{Color, Theme};

/// A piece of text placed on the overlay.  `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text:  String,
    pub x:     f32,
    pub y:     f32,
    pub size:  f32,
    pub color: Color,
}

/// English ordinal suffix for a day of the month.
pub fn date_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// Clock labels for the bottom corners: weekday and date on the left,
/// 12-hour time and AM/PM on the right.
///
/// Positions are baselines measured from the bottom-left of the overlay,
/// shifted up by each label's size to give a top-left corner.
pub fn clock_labels<Tz: TimeZone>(now: &DateTime<Tz>, width: f32, height: f32, theme: &Theme) -> Vec<Label>
where
    Tz::Offset: std::fmt::Display,
{
    let scale = theme.font_size / 25.0;
    let [primary, secondary] = theme.text;
    let label = |text: String, x: f32, baseline: f32, size: f32, color: Color| {
        let size = size * scale;
        Label { text, x, y: baseline - size, size, color }
    };

    vec![
        label(now.format("%a").to_string(), 15.0, height - 50.0, 25.0, primary),
        label(now.day().to_string(), 15.0, height - 30.0, 20.0, secondary),
        label(date_suffix(now.day()).to_string(), 45.0, height - 30.0, 10.0, secondary),
        label(now.format("%p").to_string(), width - 36.0, height - 30.0, 14.0, secondary),
        label(now.format("%I:%M").to_string(), width - 90.0, height - 50.0, 25.0, primary),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn suffixes() {
        let got: Vec<&str> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 24, 31]
            .into_iter()
            .map(date_suffix)
            .collect();
        assert_eq!(
            got,
            ["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "rd", "th", "st"]
        );
    }

    #[test]
    fn labels_for_a_friday_afternoon() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 2)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
            .and_utc();
        let theme = Theme::default();
        let labels = clock_labels(&now, 1920.0, 530.0, &theme);
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts, ["Fri", "2", "nd", "PM", "02:05"]);
        assert_eq!(labels[0].y, 530.0 - 50.0 - 25.0);
        assert_eq!(labels[4].x, 1920.0 - 90.0);
        assert_eq!(labels[1].color, theme.text[1]);
    }

    #[test]
    fn sizes_follow_the_theme() {
        let theme = Theme { font_size: 50.0, ..Theme::default() };
        let labels = clock_labels(&Utc::now(), 800.0, 300.0, &theme);
        assert_eq!(labels[0].size, 50.0);
        assert_eq!(labels[2].size, 20.0);
    }
}
