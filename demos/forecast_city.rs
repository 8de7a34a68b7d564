use std::env;
use weather_predict::{DatasetSource, OpenWeatherMap, WeatherPredict, WeatherPredictError};

/// Usage: forecast_city <city> <weather.csv>
///
/// Reads the API key from OPENWEATHER_API_KEY.
#[tokio::main]
async fn main() -> Result<(), WeatherPredictError> {
    let mut args = env::args().skip(1);
    let city = args.next().unwrap_or_else(|| "Pune".to_string());
    let csv_path = args.next().unwrap_or_else(|| "weather.csv".to_string());

    let client = WeatherPredict::builder()
        .source(OpenWeatherMap::from_env()?)
        .dataset(DatasetSource::csv_file(csv_path))
        .build();

    let forecast = client.forecast().city(&city).call().await?;
    let observation = &forecast.observation;
    println!(
        "{}, {}: {} °C (feels like {} °C), {}",
        observation.city,
        observation.country,
        observation.temperature,
        observation.feels_like,
        observation.description
    );
    println!(
        "Wind from {} at {} m/s, humidity {}%, pressure {} hPa",
        forecast.compass_direction,
        observation.wind_speed,
        observation.humidity,
        observation.pressure
    );
    println!("Rain tomorrow: {}", forecast.rain.label);

    println!("\nTime   Temp (°C)  Humidity (%)");
    for (temp, humidity) in forecast
        .temperature
        .points
        .iter()
        .zip(&forecast.humidity.points)
    {
        println!(
            "{}  {:>9.1}  {:>12.1}",
            temp.time.format("%H:%M"),
            temp.value,
            humidity.value
        );
    }

    Ok(())
}
