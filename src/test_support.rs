use crate::compass::CompassDirection;
use crate::live::observation::LiveObservation;
use polars::prelude::*;

/// A clean historical log with `rows` distinct rows and both rain classes once it
/// spans more than a handful of days.
pub(crate) fn synthetic_frame(rows: usize) -> PolarsResult<DataFrame> {
    let index: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let temp: Vec<f64> = index.iter().map(|i| 15.0 + 8.0 * (0.3 * i).sin()).collect();
    let humidity: Vec<f64> = index.iter().map(|i| 60.0 + 25.0 * (0.2 * i).cos()).collect();
    let min_temp: Vec<f64> = temp.iter().map(|t| t - 6.0).collect();
    let max_temp: Vec<f64> = temp.iter().map(|t| t + 5.0).collect();
    let pressure: Vec<f64> = index.iter().map(|i| 1000.0 + 0.1 * i).collect();
    let wind_gust_speed: Vec<f64> = (0..rows).map(|i| 30.0 + (i % 11) as f64 * 3.0).collect();
    let wind_gust_dir: Vec<&str> = (0..rows)
        .map(|i| {
            CompassDirection::from_degrees((i % 16) as f64 * 22.5)
                .map(|direction| direction.label())
                .unwrap_or("N")
        })
        .collect();
    let rain_tomorrow: Vec<&str> = humidity
        .iter()
        .map(|&h| if h > 70.0 { "Yes" } else { "No" })
        .collect();

    df!(
        "MinTemp" => min_temp,
        "MaxTemp" => max_temp,
        "WindGustDir" => wind_gust_dir,
        "WindGustSpeed" => wind_gust_speed,
        "Humidity" => humidity,
        "Pressure" => pressure,
        "Temp" => temp,
        "RainTomorrow" => rain_tomorrow
    )
}

pub(crate) fn observation(wind_bearing: f64) -> LiveObservation {
    LiveObservation {
        city: "Pune".to_string(),
        country: "IN".to_string(),
        temperature: 24.0,
        feels_like: 25.0,
        temp_min: 19.0,
        temp_max: 28.0,
        humidity: 72.0,
        description: "scattered clouds".to_string(),
        wind_bearing,
        wind_speed: 35.0,
        pressure: 1004.0,
        clouds: 40.0,
        visibility: 10000.0,
    }
}
