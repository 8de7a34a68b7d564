//! This module provides the main entry point of the crate: a client that turns a city
//! name into a rain-tomorrow call and an hourly temperature and humidity forecast.

use crate::dataset::loader::DatasetSource;
use crate::error::WeatherPredictError;
use crate::forecast::assembler::ForecastResult;
use crate::forest::config::ForestConfig;
use crate::live::open_weather::{OpenWeatherMap, WeatherSource};
use crate::model_store::{ForecastModel, ModelStore};
use bon::bon;
use chrono::{DateTime, FixedOffset, Local};
use log::info;
use std::sync::Arc;

/// The main client for producing forecasts.
///
/// A `WeatherPredict` owns a [`WeatherSource`] for current conditions and a
/// [`ModelStore`] that trains models from the historical weather log. The first forecast
/// trains the models; later forecasts reuse them until [`WeatherPredict::refresh_model`]
/// is called.
///
/// # Examples
///
/// ```rust,no_run
/// # use weather_predict::{DatasetSource, OpenWeatherMap, WeatherPredict, WeatherPredictError};
/// # async fn run() -> Result<(), WeatherPredictError> {
/// let client = WeatherPredict::builder()
///     .source(OpenWeatherMap::from_env()?)
///     .dataset(DatasetSource::csv_file("weather.csv"))
///     .build();
///
/// let forecast = client.forecast().city("Pune").call().await?;
/// println!(
///     "Rain tomorrow: {} (wind from {})",
///     forecast.rain.label, forecast.compass_direction
/// );
/// for point in &forecast.temperature.points {
///     println!("{}: {:.1} °C", point.time.format("%H:%M"), point.value);
/// }
/// # Ok(())
/// # }
/// ```
pub struct WeatherPredict<S = OpenWeatherMap> {
    source: S,
    models: ModelStore,
}

#[bon]
impl<S: WeatherSource> WeatherPredict<S> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `source` - Where current conditions come from.
    /// * `dataset` - The historical weather log the models are trained on. It is read
    ///   again on every training run.
    /// * `forest` - Forest hyperparameters. Defaults to [`ForestConfig::default`].
    #[builder]
    pub fn new(source: S, dataset: DatasetSource, forest: Option<ForestConfig>) -> Self {
        Self {
            source,
            models: ModelStore::new(dataset, forest.unwrap_or_default()),
        }
    }

    /// Forecasts the weather for a city.
    ///
    /// This method uses a builder pattern: set `.city(..)`, optionally `.now(..)`, then
    /// `.call().await`.
    ///
    /// The current conditions are fetched first, so an unknown city fails before any
    /// training happens. The hourly time axis starts at the top of the hour after `now`,
    /// which defaults to the local time of the machine.
    ///
    /// # Errors
    ///
    /// * [`WeatherPredictError::LiveWeather`] if the current conditions cannot be fetched.
    /// * [`WeatherPredictError::DatasetLoad`] or [`WeatherPredictError::Training`] if no
    ///   model is published yet and training one fails.
    /// * [`WeatherPredictError::InvalidBearing`] if the reported wind bearing is not finite.
    /// * [`WeatherPredictError::TaskJoin`] if the training task panicked.
    #[builder]
    pub async fn forecast(
        &self,
        city: &str,
        now: Option<DateTime<FixedOffset>>,
    ) -> Result<ForecastResult, WeatherPredictError> {
        let observation = self.source.current(city).await?;
        let model = self.models.get_or_train().await?;
        let now = now.unwrap_or_else(|| Local::now().fixed_offset());
        let result = model.predict(observation, now)?;
        info!(
            "Forecast for '{}' from model generation {}: rain tomorrow {}",
            city, result.model_generation, result.rain.label
        );
        Ok(result)
    }

    /// Retrains every model from the historical log and publishes a new generation.
    ///
    /// Forecasts already running keep the generation they started with. If training
    /// fails, the previous generation stays published.
    pub async fn refresh_model(&self) -> Result<Arc<ForecastModel>, WeatherPredictError> {
        self.models.refresh().await
    }

    /// The published model generation, if one has been trained.
    pub async fn model(&self) -> Option<Arc<ForecastModel>> {
        self.models.current().await
    }
}
