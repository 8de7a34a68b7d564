use serde::{Deserialize, Serialize};

/// Current conditions for one city, as reported by a [`crate::WeatherSource`].
///
/// Temperatures are in °C and rounded to whole degrees; humidity is a rounded
/// percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveObservation {
    /// City name as resolved by the source, which may differ from the query.
    pub city: String,
    /// ISO 3166 country code, e.g. `"IN"`.
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    /// Free-text summary such as `"light rain"`.
    pub description: String,
    /// Wind bearing in degrees. Not normalized.
    pub wind_bearing: f64,
    pub wind_speed: f64,
    /// Sea-level pressure in hPa.
    pub pressure: f64,
    /// Cloud cover in percent.
    pub clouds: f64,
    /// Visibility in meters.
    pub visibility: f64,
}
