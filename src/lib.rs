mod compass;
mod dataset;
mod encoding;
mod error;
mod forecast;
mod forest;
mod live;
mod model_store;
mod training;
mod weather_predict;

#[cfg(test)]
mod test_support;

pub use error::WeatherPredictError;
pub use weather_predict::*;

pub use compass::CompassDirection;
pub use encoding::{EncodedCategory, UNKNOWN_CODE};

pub use dataset::columns::WeatherColumn;
pub use dataset::loader::{DatasetSource, HistoricalDataset};
pub use dataset::record::HistoricalRecord;

pub use forest::config::ForestConfig;
pub use forest::random_forest::{RandomForestClassifier, RandomForestRegressor};

pub use training::autoregressive::{lag_pairs, TrainedRegressor};
pub use training::rain::{
    HoldoutReport, RainFeatures, RainPrediction, TrainedRainClassifier, RAIN_LABEL,
};

pub use forecast::assembler::{assemble, ForecastPoint, ForecastResult, ForecastTrajectory};
pub use forecast::iterative::{iterate_forecast, DEFAULT_HORIZON};
pub use forecast::time_axis::{hourly_axis, top_of_next_hour};

pub use live::observation::LiveObservation;
pub use live::open_weather::{
    OpenWeatherMap, WeatherSource, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};

pub use model_store::{ForecastModel, ModelStore};

pub use dataset::error::DatasetLoadError;
pub use live::error::LiveWeatherError;
pub use training::error::TrainingError;
