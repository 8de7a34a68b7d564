use serde::{Deserialize, Serialize};

/// One day of the historical weather log, restricted to the columns the models use.
///
/// Records are produced by [`crate::HistoricalDataset::records`] after cleaning, so every
/// field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub min_temp: f64,
    pub max_temp: f64,
    /// Compass label of the strongest gust, e.g. `"WNW"`.
    pub wind_gust_dir: String,
    pub wind_gust_speed: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub temp: f64,
    /// `"Yes"` or `"No"`.
    pub rain_tomorrow: String,
}
