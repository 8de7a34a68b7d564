use crate::dataset::error::DatasetLoadError;
use crate::live::error::LiveWeatherError;
use crate::training::error::TrainingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherPredictError {
    #[error(transparent)]
    LiveWeather(#[from] LiveWeatherError),

    #[error(transparent)]
    DatasetLoad(#[from] DatasetLoadError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error("Wind bearing {0} does not resolve to a compass direction")]
    InvalidBearing(f64),

    #[error("Background training task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
