//! Defines the `CompassDirection` enum, mapping a wind bearing in degrees to one of the
//! sixteen named points of the compass rose.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the sixteen compass points used for the `WindGustDir` column of the
/// historical weather log.
///
/// Convert a bearing with [`CompassDirection::from_degrees`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

/// Half-open `[start, end)` bearing intervals. North is split into two half-intervals
/// at the ends of the turn instead of one wrapped interval.
const BUCKETS: [(CompassDirection, f64, f64); 17] = [
    (CompassDirection::N, 0.0, 11.25),
    (CompassDirection::NNE, 11.25, 33.75),
    (CompassDirection::NE, 33.75, 56.25),
    (CompassDirection::ENE, 56.25, 78.75),
    (CompassDirection::E, 78.75, 101.25),
    (CompassDirection::ESE, 101.25, 123.75),
    (CompassDirection::SE, 123.75, 146.25),
    (CompassDirection::SSE, 146.25, 168.75),
    (CompassDirection::S, 168.75, 191.25),
    (CompassDirection::SSW, 191.25, 213.75),
    (CompassDirection::SW, 213.75, 236.25),
    (CompassDirection::WSW, 236.25, 258.75),
    (CompassDirection::W, 258.75, 281.25),
    (CompassDirection::WNW, 281.25, 303.75),
    (CompassDirection::NW, 303.75, 326.25),
    (CompassDirection::NNW, 326.25, 348.75),
    (CompassDirection::N, 348.75, 360.0),
];

impl CompassDirection {
    /// Resolves a bearing in degrees to its compass point.
    ///
    /// The bearing is first normalized into `[0, 360)`, so negative bearings and bearings
    /// of a full turn or more are accepted. A bearing that lies exactly on a boundary
    /// belongs to the interval that starts there.
    ///
    /// # Returns
    ///
    /// * `Some(CompassDirection)` for every finite bearing.
    /// * `None` for `NaN` or infinite bearings, which fall in no interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use weather_predict::CompassDirection;
    ///
    /// assert_eq!(CompassDirection::from_degrees(200.0), Some(CompassDirection::SSW));
    /// assert_eq!(CompassDirection::from_degrees(11.25), Some(CompassDirection::NNE));
    /// assert_eq!(CompassDirection::from_degrees(-90.0), Some(CompassDirection::W));
    /// assert_eq!(CompassDirection::from_degrees(f64::NAN), None);
    /// ```
    pub fn from_degrees(bearing: f64) -> Option<Self> {
        let mut normalized = bearing.rem_euclid(360.0);
        // rem_euclid can round a tiny negative bearing up to exactly 360.
        if normalized >= 360.0 {
            normalized = 0.0;
        }
        BUCKETS
            .iter()
            .find(|(_, start, end)| *start <= normalized && normalized < *end)
            .map(|(direction, _, _)| *direction)
    }

    /// The label used for this direction in the historical weather log.
    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NNE => "NNE",
            CompassDirection::NE => "NE",
            CompassDirection::ENE => "ENE",
            CompassDirection::E => "E",
            CompassDirection::ESE => "ESE",
            CompassDirection::SE => "SE",
            CompassDirection::SSE => "SSE",
            CompassDirection::S => "S",
            CompassDirection::SSW => "SSW",
            CompassDirection::SW => "SW",
            CompassDirection::WSW => "WSW",
            CompassDirection::W => "W",
            CompassDirection::WNW => "WNW",
            CompassDirection::NW => "NW",
            CompassDirection::NNW => "NNW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_next_bucket() {
        assert_eq!(CompassDirection::from_degrees(11.25), Some(CompassDirection::NNE));
        assert_eq!(CompassDirection::from_degrees(11.249999), Some(CompassDirection::N));
        assert_eq!(CompassDirection::from_degrees(348.75), Some(CompassDirection::N));
        assert_eq!(CompassDirection::from_degrees(348.7499), Some(CompassDirection::NNW));
        assert_eq!(CompassDirection::from_degrees(191.25), Some(CompassDirection::SSW));
    }

    #[test]
    fn test_every_bearing_resolves_and_wraps() {
        let mut bearing = 0.0;
        while bearing < 360.0 {
            let direction = CompassDirection::from_degrees(bearing);
            assert!(direction.is_some(), "bearing {} has no direction", bearing);
            assert_eq!(direction, CompassDirection::from_degrees(bearing + 360.0));
            assert_eq!(direction, CompassDirection::from_degrees(bearing - 720.0));
            bearing += 0.25;
        }
    }

    #[test]
    fn test_normalization() {
        assert_eq!(CompassDirection::from_degrees(360.0), Some(CompassDirection::N));
        assert_eq!(CompassDirection::from_degrees(765.0), Some(CompassDirection::NE));
        assert_eq!(CompassDirection::from_degrees(-1e-20), Some(CompassDirection::N));
        assert_eq!(CompassDirection::from_degrees(f64::INFINITY), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CompassDirection::from_degrees(200.0).map(|d| d.label()), Some("SSW"));
        assert_eq!(CompassDirection::WNW.to_string(), "WNW");
    }
}
