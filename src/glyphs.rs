//! Weather and wind icon classification
//!
//! Maps WMO weather codes and wind bearings onto private-use-area code points
//! from the Weather Icons font. Every weather code group carries three glyphs
//! (day, night, calm) so both call sites share one table.

use std::fmt;

use serde::Serialize;

/// A single display code point from the icon font
///
/// Opaque to everything except the renderer. `Glyph::BLANK` is used where no
/// icon applies, e.g. weather codes outside the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Glyph(&'static str);

impl Glyph {
    /// The empty glyph
    pub const BLANK: Glyph = Glyph("");

    /// Returns the code point as a string slice
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Whether this is the empty glyph
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Which palette to pick from a glyph set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMode {
    /// Normal palette, daytime variant
    Day,
    /// Normal palette, night-time variant
    Night,
    /// Quiet-hours palette used by the current-conditions row
    Calm,
}

/// WMO weather code groups that have an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionGroup {
    Clear,
    PartlyCloudy,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    ThunderstormHail,
}

impl ConditionGroup {
    /// Groups a raw WMO weather code
    ///
    /// Weather codes from WMO (World Meteorological Organization):
    /// - 0, 1: Clear / mainly clear
    /// - 2, 3: Partly cloudy / overcast
    /// - 45, 48: Fog
    /// - 51, 53, 55: Drizzle
    /// - 56, 57: Freezing drizzle
    /// - 61, 63, 65: Rain
    /// - 66, 67: Freezing rain
    /// - 71, 73, 75, 77: Snow
    /// - 80-82: Rain showers
    /// - 85, 86: Snow showers
    /// - 95: Thunderstorm
    /// - 96, 99: Thunderstorm with hail
    ///
    /// Returns `None` for anything else.
    pub fn from_code(code: i32) -> Option<Self> {
        let group = match code {
            0 | 1 => ConditionGroup::Clear,
            2 | 3 => ConditionGroup::PartlyCloudy,
            45 | 48 => ConditionGroup::Fog,
            51 | 53 | 55 => ConditionGroup::Drizzle,
            56 | 57 => ConditionGroup::FreezingDrizzle,
            61 | 63 | 65 => ConditionGroup::Rain,
            66 | 67 => ConditionGroup::FreezingRain,
            71 | 73 | 75 | 77 => ConditionGroup::Snow,
            80..=82 => ConditionGroup::RainShowers,
            85 | 86 => ConditionGroup::SnowShowers,
            95 => ConditionGroup::Thunderstorm,
            96 | 99 => ConditionGroup::ThunderstormHail,
            _ => return None,
        };
        Some(group)
    }

    /// The glyph set for this group
    pub fn glyphs(self) -> &'static GlyphSet {
        &GLYPH_TABLE[self as usize]
    }
}

/// Day, night and calm variants of one condition icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    pub day: Glyph,
    pub night: Glyph,
    pub calm: Glyph,
}

impl GlyphSet {
    const fn new(day: &'static str, night: &'static str, calm: &'static str) -> Self {
        Self {
            day: Glyph(day),
            night: Glyph(night),
            calm: Glyph(calm),
        }
    }

    /// Same glyph regardless of mode
    const fn uniform(glyph: &'static str) -> Self {
        Self::new(glyph, glyph, glyph)
    }

    /// Picks the variant for a mode
    pub fn for_mode(&self, mode: WeatherMode) -> Glyph {
        match mode {
            WeatherMode::Day => self.day,
            WeatherMode::Night => self.night,
            WeatherMode::Calm => self.calm,
        }
    }
}

/// Indexed by `ConditionGroup as usize`; order must follow the enum.
///
/// Calm differs from night only for clear (`f077` stars) and partly cloudy
/// (`f031` night-cloudy). The panel used to show the night glyphs `f02e` and
/// `f086` there outside the daytime band.
static GLYPH_TABLE: [GlyphSet; 12] = [
    GlyphSet::new("\u{f00d}", "\u{f02e}", "\u{f077}"), // Clear
    GlyphSet::new("\u{f00c}", "\u{f086}", "\u{f031}"), // PartlyCloudy
    GlyphSet::new("\u{f003}", "\u{f04a}", "\u{f04a}"), // Fog
    GlyphSet::new("\u{f009}", "\u{f029}", "\u{f029}"), // Drizzle
    GlyphSet::uniform("\u{f017}"),                     // FreezingDrizzle
    GlyphSet::uniform("\u{f019}"),                     // Rain
    GlyphSet::uniform("\u{f01b}"),                     // FreezingRain
    GlyphSet::uniform("\u{f01b}"),                     // Snow
    GlyphSet::uniform("\u{f01a}"),                     // RainShowers
    GlyphSet::uniform("\u{f01b}"),                     // SnowShowers
    GlyphSet::uniform("\u{f01d}"),                     // Thunderstorm
    GlyphSet::uniform("\u{f01e}"),                     // ThunderstormHail
];

/// Maps a weather code to its icon for the given mode
///
/// Codes outside the table give `Glyph::BLANK`.
pub fn classify_weather(code: i32, mode: WeatherMode) -> Glyph {
    ConditionGroup::from_code(code)
        .map(|group| group.glyphs().for_mode(mode))
        .unwrap_or(Glyph::BLANK)
}

/// Compass sectors as (exclusive upper bound in degrees, glyph), clockwise from north.
const WIND_SECTORS: [(i32, Glyph); 8] = [
    (22, Glyph("\u{f058}")),  // N
    (67, Glyph("\u{f057}")),  // NE
    (112, Glyph("\u{f04d}")), // E
    (157, Glyph("\u{f088}")), // SE
    (202, Glyph("\u{f044}")), // S
    (247, Glyph("\u{f043}")), // SW
    (292, Glyph("\u{f048}")), // W
    (360, Glyph("\u{f087}")), // NW
];

/// Maps a wind bearing in degrees to one of the eight compass glyphs
///
/// Input is expected in `[0, 360)`. Values past the last bound stay in the
/// north-west sector and negative values land in the north sector.
pub fn classify_wind_direction(degrees: i32) -> Glyph {
    WIND_SECTORS
        .iter()
        .find(|(upper, _)| degrees < *upper)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(WIND_SECTORS[WIND_SECTORS.len() - 1].1)
}

/// True for forecast hour indices 6 through 19
pub fn is_daytime_hour_index(index: usize) -> bool {
    index > 5 && index < 20
}

/// Day or night palette for a row of the hourly table
pub fn hourly_mode(index: usize) -> WeatherMode {
    if is_daytime_hour_index(index) {
        WeatherMode::Day
    } else {
        WeatherMode::Night
    }
}

/// Palette for the current-conditions row
///
/// `threshold` is supplied by the caller (usually the local hour). Inside the
/// open band (5, 20) the normal daytime palette applies, anything else is
/// treated as quiet hours.
pub fn snapshot_mode(threshold: i32) -> WeatherMode {
    if threshold > 5 && threshold < 20 {
        WeatherMode::Day
    } else {
        WeatherMode::Calm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_CODES: [i32; 28] = [
        0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82,
        85, 86, 95, 96, 99,
    ];

    #[test]
    fn test_clear_codes_have_three_distinct_glyphs() {
        for code in [0, 1] {
            let day = classify_weather(code, WeatherMode::Day);
            let night = classify_weather(code, WeatherMode::Night);
            let calm = classify_weather(code, WeatherMode::Calm);

            assert_eq!(day.as_str(), "\u{f00d}");
            assert_eq!(night.as_str(), "\u{f02e}");
            assert_eq!(calm.as_str(), "\u{f077}");
            assert_ne!(day, night);
            assert_ne!(day, calm);
            assert_ne!(night, calm);
        }
    }

    #[test]
    fn test_calm_differs_from_night_only_for_clear_and_partly_cloudy() {
        for code in TABLE_CODES {
            let night = classify_weather(code, WeatherMode::Night);
            let calm = classify_weather(code, WeatherMode::Calm);
            match ConditionGroup::from_code(code) {
                Some(ConditionGroup::Clear) | Some(ConditionGroup::PartlyCloudy) => {
                    assert_ne!(night, calm, "code {}", code)
                }
                _ => assert_eq!(night, calm, "code {}", code),
            }
        }
        assert_eq!(classify_weather(3, WeatherMode::Calm).as_str(), "\u{f031}");
        assert_eq!(snapshot_mode(22), WeatherMode::Calm);
        assert_eq!(classify_weather(0, snapshot_mode(22)).as_str(), "\u{f077}");
    }

    #[test]
    fn test_codes_in_same_group_share_glyphs() {
        let modes = [WeatherMode::Day, WeatherMode::Night, WeatherMode::Calm];
        let pairs = [(0, 1), (2, 3), (45, 48), (51, 55), (61, 65), (71, 77), (80, 82), (96, 99)];

        for (a, b) in pairs {
            for mode in modes {
                assert_eq!(classify_weather(a, mode), classify_weather(b, mode));
            }
        }
    }

    #[test]
    fn test_every_table_code_has_a_glyph() {
        for code in TABLE_CODES {
            for mode in [WeatherMode::Day, WeatherMode::Night, WeatherMode::Calm] {
                assert!(
                    !classify_weather(code, mode).is_blank(),
                    "code {} should have a glyph in {:?}",
                    code,
                    mode
                );
            }
        }
    }

    #[test]
    fn test_unknown_codes_are_blank() {
        for code in [-1, 4, 44, 50, 52, 68, 78, 90, 97, 100, 999] {
            assert!(classify_weather(code, WeatherMode::Day).is_blank());
            assert!(classify_weather(code, WeatherMode::Calm).is_blank());
        }
    }

    #[test]
    fn test_specific_day_and_night_glyphs() {
        assert_eq!(classify_weather(2, WeatherMode::Day).as_str(), "\u{f00c}");
        assert_eq!(classify_weather(2, WeatherMode::Night).as_str(), "\u{f086}");
        assert_eq!(classify_weather(45, WeatherMode::Night).as_str(), "\u{f04a}");
        assert_eq!(classify_weather(53, WeatherMode::Day).as_str(), "\u{f009}");
        assert_eq!(classify_weather(53, WeatherMode::Night).as_str(), "\u{f029}");
        assert_eq!(classify_weather(95, WeatherMode::Night).as_str(), "\u{f01d}");
        assert_eq!(classify_weather(99, WeatherMode::Day).as_str(), "\u{f01e}");
    }

    #[test]
    fn test_wind_sector_boundaries() {
        let expected = [
            (0, "\u{f058}"),
            (21, "\u{f058}"),
            (22, "\u{f057}"),
            (66, "\u{f057}"),
            (67, "\u{f04d}"),
            (111, "\u{f04d}"),
            (112, "\u{f088}"),
            (156, "\u{f088}"),
            (157, "\u{f044}"),
            (201, "\u{f044}"),
            (202, "\u{f043}"),
            (246, "\u{f043}"),
            (247, "\u{f048}"),
            (291, "\u{f048}"),
            (292, "\u{f087}"),
            (359, "\u{f087}"),
        ];

        for (degrees, glyph) in expected {
            assert_eq!(
                classify_wind_direction(degrees).as_str(),
                glyph,
                "wrong sector for {} degrees",
                degrees
            );
        }
    }

    #[test]
    fn test_wind_sectors_are_contiguous_and_exhaustive() {
        let mut distinct = Vec::new();
        let mut changes = Vec::new();
        let mut previous = classify_wind_direction(0);
        distinct.push(previous);

        for degrees in 1..360 {
            let glyph = classify_wind_direction(degrees);
            assert!(!glyph.is_blank());
            if glyph != previous {
                assert!(!distinct.contains(&glyph), "sector revisited at {}", degrees);
                distinct.push(glyph);
                changes.push(degrees);
                previous = glyph;
            }
        }

        assert_eq!(distinct.len(), 8);
        assert_eq!(changes, vec![22, 67, 112, 157, 202, 247, 292]);
    }

    #[test]
    fn test_daytime_hour_index() {
        assert!(!is_daytime_hour_index(0));
        assert!(!is_daytime_hour_index(5));
        assert!(is_daytime_hour_index(6));
        assert!(is_daytime_hour_index(19));
        assert!(!is_daytime_hour_index(20));
        assert!(!is_daytime_hour_index(23));

        assert_eq!(hourly_mode(12), WeatherMode::Day);
        assert_eq!(hourly_mode(22), WeatherMode::Night);
    }

    #[test]
    fn test_snapshot_mode_band() {
        assert_eq!(snapshot_mode(5), WeatherMode::Calm);
        assert_eq!(snapshot_mode(6), WeatherMode::Day);
        assert_eq!(snapshot_mode(19), WeatherMode::Day);
        assert_eq!(snapshot_mode(20), WeatherMode::Calm);
        assert_eq!(snapshot_mode(-3), WeatherMode::Calm);
    }

    #[test]
    fn test_glyph_display_and_serialize() {
        let glyph = classify_weather(0, WeatherMode::Day);
        assert_eq!(glyph.to_string(), "\u{f00d}");
        assert_eq!(serde_json::to_string(&glyph).unwrap(), "\"\u{f00d}\"");
        assert_eq!(Glyph::BLANK.to_string(), "");
    }
}
