//! Combines a live observation with a trained model generation into a [`ForecastResult`].

use crate::compass::CompassDirection;
use crate::error::WeatherPredictError;
use crate::forecast::time_axis::hourly_axis;
use crate::live::observation::LiveObservation;
use crate::model_store::ForecastModel;
use crate::training::rain::{RainFeatures, RainPrediction};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<FixedOffset>,
    pub value: f64,
}

/// Forecast values of one column at strictly increasing hourly timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTrajectory {
    pub points: Vec<ForecastPoint>,
}

impl ForecastTrajectory {
    /// Pairs each timestamp with the value at the same position.
    pub fn new(times: &[DateTime<FixedOffset>], values: &[f64]) -> Self {
        Self {
            points: times
                .iter()
                .zip(values)
                .map(|(&time, &value)| ForecastPoint { time, value })
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Everything a forecast request produces, ready to be serialized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub observation: LiveObservation,
    /// Compass point of the observed wind bearing.
    pub compass_direction: CompassDirection,
    /// Code of `compass_direction` under the model's wind-direction encoding, `-1` if
    /// the historical log never saw that direction.
    pub wind_gust_dir_code: i64,
    pub rain: RainPrediction,
    pub temperature: ForecastTrajectory,
    pub humidity: ForecastTrajectory,
    pub generated_at: DateTime<FixedOffset>,
    /// Generation of the [`ForecastModel`] that produced this result.
    pub model_generation: u64,
}

/// Runs every model of `model` against `observation`.
///
/// The temperature trajectory is rolled forward from the observed temperature and the
/// humidity trajectory from the observed humidity, each with its own regressor. Both
/// share a time axis of `horizon` hourly steps after `now`.
///
/// # Errors
///
/// Returns [`WeatherPredictError::InvalidBearing`] if the wind bearing is not finite.
pub fn assemble(
    observation: LiveObservation,
    model: &ForecastModel,
    now: DateTime<FixedOffset>,
    horizon: usize,
) -> Result<ForecastResult, WeatherPredictError> {
    let compass_direction = CompassDirection::from_degrees(observation.wind_bearing)
        .ok_or(WeatherPredictError::InvalidBearing(observation.wind_bearing))?;
    let wind_gust_dir_code = model.rain().wind_gust_dir_code(compass_direction.label());

    let rain = model.rain().predict(&RainFeatures {
        min_temp: observation.temp_min,
        max_temp: observation.temp_max,
        wind_gust_dir: compass_direction.label().to_string(),
        wind_gust_speed: observation.wind_speed,
        humidity: observation.humidity,
        pressure: observation.pressure,
        temp: observation.temperature,
    });

    let axis = hourly_axis(now, horizon);
    let temperature = ForecastTrajectory::new(
        &axis,
        &model.temperature().forecast(observation.temperature, horizon),
    );
    let humidity = ForecastTrajectory::new(
        &axis,
        &model.humidity().forecast(observation.humidity, horizon),
    );

    Ok(ForecastResult {
        observation,
        compass_direction,
        wind_gust_dir_code,
        rain,
        temperature,
        humidity,
        generated_at: now,
        model_generation: model.generation(),
    })
}
