//! Defines the columns of the historical weather log that the forecasting models read.

use std::fmt;

/// A named column of the historical weather log.
///
/// The log may carry more columns than these (the well-known Australian weather
/// dataset has 20+), but only the ones listed here feed the models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherColumn {
    /// Minimum temperature of the day, in °C.
    MinTemp,
    /// Maximum temperature of the day, in °C.
    MaxTemp,
    /// Compass label (e.g. "SSW") of the strongest wind gust.
    WindGustDir,
    /// Speed of the strongest wind gust.
    WindGustSpeed,
    /// Relative humidity, in percent.
    Humidity,
    /// Atmospheric pressure, in hPa.
    Pressure,
    /// Observed temperature, in °C.
    Temp,
    /// "Yes" if it rained the following day, "No" otherwise.
    RainTomorrow,
}

impl WeatherColumn {
    /// Every column a historical record is made of, in record order.
    pub const ALL: [WeatherColumn; 8] = [
        WeatherColumn::MinTemp,
        WeatherColumn::MaxTemp,
        WeatherColumn::WindGustDir,
        WeatherColumn::WindGustSpeed,
        WeatherColumn::Humidity,
        WeatherColumn::Pressure,
        WeatherColumn::Temp,
        WeatherColumn::RainTomorrow,
    ];

    /// The seven columns the rain classifier is trained on, in feature-vector order.
    pub const RAIN_FEATURES: [WeatherColumn; 7] = [
        WeatherColumn::MinTemp,
        WeatherColumn::MaxTemp,
        WeatherColumn::WindGustDir,
        WeatherColumn::WindGustSpeed,
        WeatherColumn::Humidity,
        WeatherColumn::Pressure,
        WeatherColumn::Temp,
    ];

    /// The header name of this column in the CSV log.
    pub fn name(&self) -> &'static str {
        match self {
            WeatherColumn::MinTemp => "MinTemp",
            WeatherColumn::MaxTemp => "MaxTemp",
            WeatherColumn::WindGustDir => "WindGustDir",
            WeatherColumn::WindGustSpeed => "WindGustSpeed",
            WeatherColumn::Humidity => "Humidity",
            WeatherColumn::Pressure => "Pressure",
            WeatherColumn::Temp => "Temp",
            WeatherColumn::RainTomorrow => "RainTomorrow",
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, WeatherColumn::WindGustDir | WeatherColumn::RainTomorrow)
    }
}

/// Formats a `WeatherColumn` using its CSV header name.
///
/// # Examples
///
/// ```
/// use weather_predict::WeatherColumn;
///
/// assert_eq!(WeatherColumn::WindGustDir.to_string(), "WindGustDir");
/// ```
impl fmt::Display for WeatherColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
