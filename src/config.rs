use std::env;
use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_CONNECTOR_THRESHOLD: f64 = 1.0;
pub const DEFAULT_MARKER_RADIUS: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Packed `0xRRGGBB`, the form spreadsheet formats expect.
    pub fn packed(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

/// Background/foreground pair for one table cell. `fg == None` keeps the
/// renderer's default text colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellStyle {
    pub bg: Rgb,
    pub fg: Option<Rgb>,
}

impl CellStyle {
    pub const NEUTRAL: CellStyle = CellStyle {
        bg: Rgb::WHITE,
        fg: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionColors {
    pub over: Rgb,
    pub under: Rgb,
    pub as_expected: Rgb,
    pub actual_marker: Rgb,
}

pub const DIRECTION_COLORS: DirectionColors = DirectionColors {
    over: Rgb(0x2e, 0xa0, 0x43),
    under: Rgb(0xd6, 0x27, 0x28),
    as_expected: Rgb(0x9e, 0x9e, 0x9e),
    actual_marker: Rgb(0x1f, 0x3a, 0x93),
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonStyle {
    pub magnitude_threshold: f64,
    // Connector endpoints sit this far (in points) from each marker centre.
    pub marker_radius: f64,
    pub colors: DirectionColors,
}

impl Default for ComparisonStyle {
    fn default() -> Self {
        Self {
            magnitude_threshold: DEFAULT_CONNECTOR_THRESHOLD,
            marker_radius: DEFAULT_MARKER_RADIUS,
            colors: DIRECTION_COLORS,
        }
    }
}

impl ComparisonStyle {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.magnitude_threshold = threshold;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandSpec {
    pub label: &'static str,
    pub style: CellStyle,
}

/// Five difficulty bands over [0,1]. `thresholds[i]` is the exclusive upper
/// bound of band `i`; the last band is closed at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FdrBands {
    pub thresholds: [f64; 4],
    pub bands: [BandSpec; 5],
    pub neutral: CellStyle,
}

pub const FDR_BANDS: FdrBands = FdrBands {
    thresholds: [0.2, 0.4, 0.6, 0.8],
    bands: [
        BandSpec {
            label: "1 - Easiest",
            style: CellStyle {
                bg: Rgb(0x00, 0x64, 0x00),
                fg: Some(Rgb::WHITE),
            },
        },
        BandSpec {
            label: "2",
            style: CellStyle {
                bg: Rgb(0x01, 0xfc, 0x79),
                fg: None,
            },
        },
        BandSpec {
            label: "3",
            style: CellStyle {
                bg: Rgb(0xe7, 0xe7, 0xe7),
                fg: None,
            },
        },
        BandSpec {
            label: "4",
            style: CellStyle {
                bg: Rgb(0xff, 0x17, 0x51),
                fg: Some(Rgb::WHITE),
            },
        },
        BandSpec {
            label: "5 - Hardest",
            style: CellStyle {
                bg: Rgb(0x80, 0x08, 0x2e),
                fg: Some(Rgb::WHITE),
            },
        },
    ],
    neutral: CellStyle::NEUTRAL,
};

impl Default for FdrBands {
    fn default() -> Self {
        FDR_BANDS
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub comparison: ComparisonStyle,
    pub bands: FdrBands,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("ERE_DATA_DIR")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let threshold = parse_non_negative(
            lookup("ERE_CONNECTOR_THRESHOLD"),
            DEFAULT_CONNECTOR_THRESHOLD,
        );
        let radius = parse_non_negative(lookup("ERE_MARKER_RADIUS"), DEFAULT_MARKER_RADIUS);
        Self {
            data_dir,
            comparison: ComparisonStyle {
                magnitude_threshold: threshold,
                marker_radius: radius,
                colors: DIRECTION_COLORS,
            },
            bands: FDR_BANDS,
        }
    }
}

fn parse_non_negative(raw: Option<String>, default: f64) -> f64 {
    raw.and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|val| val.is_finite() && *val >= 0.0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let cfg = AppConfig::from_lookup(|_| None);
        assert_eq!(cfg.data_dir, PathBuf::from("."));
        assert_eq!(cfg.comparison.magnitude_threshold, 1.0);
        assert_eq!(cfg.comparison.marker_radius, 0.4);
    }

    #[test]
    fn invalid_threshold_falls_back() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("ERE_CONNECTOR_THRESHOLD", "-3"),
            ("ERE_MARKER_RADIUS", "wide"),
        ]));
        assert_eq!(cfg.comparison.magnitude_threshold, 1.0);
        assert_eq!(cfg.comparison.marker_radius, 0.4);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("ERE_DATA_DIR", " data/2025 "),
            ("ERE_CONNECTOR_THRESHOLD", "2.5"),
        ]));
        assert_eq!(cfg.data_dir, PathBuf::from("data/2025"));
        assert_eq!(cfg.comparison.magnitude_threshold, 2.5);
    }

    #[test]
    fn band_thresholds_are_increasing_inside_unit_interval() {
        let t = FDR_BANDS.thresholds;
        assert!(t.windows(2).all(|w| w[0] < w[1]));
        assert!(t[0] > 0.0 && t[3] < 1.0);
    }

    #[test]
    fn rgb_packs_as_rrggbb() {
        let c = Rgb(0x80, 0x08, 0x2e);
        assert_eq!(c.packed(), 0x80082e);
    }
}
