//! Current-weather lookup against the OpenWeatherMap API.

use crate::live::error::LiveWeatherError;
use crate::live::observation::LiveObservation;
use bon::bon;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can report the current weather of a city.
///
/// [`OpenWeatherMap`] is the production implementation; tests and embedding
/// applications can supply their own.
pub trait WeatherSource: Send + Sync {
    /// Fetches the current conditions for `city`.
    ///
    /// Implementations return [`LiveWeatherError::CityNotFound`] when the city is unknown
    /// or the reported conditions are incomplete.
    fn current(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<LiveObservation, LiveWeatherError>> + Send;
}

/// Client for the OpenWeatherMap "current weather" endpoint.
///
/// # Examples
///
/// ```rust
/// # use weather_predict::{LiveWeatherError, OpenWeatherMap};
/// # use std::time::Duration;
/// # fn run() -> Result<(), LiveWeatherError> {
/// let source = OpenWeatherMap::builder()
///     .api_key("my-key")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenWeatherMap {
    client: Client,
    api_key: String,
    base_url: String,
}

#[bon]
impl OpenWeatherMap {
    /// Creates a client with an explicit API key.
    ///
    /// `base_url` defaults to [`DEFAULT_BASE_URL`] and `timeout` to [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`LiveWeatherError::ClientBuild`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LiveWeatherError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(LiveWeatherError::ClientBuild)?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Creates a client from [`API_KEY_ENV`] and, if set, [`BASE_URL_ENV`].
    ///
    /// # Errors
    ///
    /// * [`LiveWeatherError::MissingApiKey`] if the key variable is unset or empty.
    /// * [`LiveWeatherError::ClientBuild`] if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, LiveWeatherError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(LiveWeatherError::MissingApiKey(API_KEY_ENV))?;
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::builder()
            .api_key(api_key)
            .maybe_base_url(base_url)
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for OpenWeatherMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherMap")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherSource for OpenWeatherMap {
    async fn current(&self, city: &str) -> Result<LiveObservation, LiveWeatherError> {
        let url = format!("{}/weather", self.base_url);
        info!("Requesting current weather for '{}'", city);

        // without_url keeps the appid query parameter out of error messages.
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| request_error(city, e.without_url()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("OpenWeatherMap does not know city '{}'", city);
            return Err(LiveWeatherError::CityNotFound {
                city: city.to_string(),
            });
        }
        if !status.is_success() {
            warn!("Current weather request for '{}' returned {}", city, status);
            return Err(LiveWeatherError::HttpStatus {
                city: city.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| request_error(city, e.without_url()))?;
        let payload: CurrentWeatherResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Unusable current weather payload for '{}': {}", city, e);
            LiveWeatherError::CityNotFound {
                city: city.to_string(),
            }
        })?;
        debug!("Current weather payload for '{}' parsed", city);
        payload.into_observation().ok_or_else(|| {
            warn!("Current weather payload for '{}' has no conditions", city);
            LiveWeatherError::CityNotFound {
                city: city.to_string(),
            }
        })
    }
}

fn request_error(city: &str, source: reqwest::Error) -> LiveWeatherError {
    if source.is_timeout() {
        warn!("Current weather request for '{}' timed out", city);
        LiveWeatherError::Timeout {
            city: city.to_string(),
            source,
        }
    } else {
        warn!("Current weather request for '{}' failed: {}", city, source);
        LiveWeatherError::NetworkRequest {
            city: city.to_string(),
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    sys: SysBlock,
    wind: WindBlock,
    clouds: CloudsBlock,
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    country: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    deg: f64,
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct CloudsBlock {
    all: f64,
}

impl CurrentWeatherResponse {
    fn into_observation(self) -> Option<LiveObservation> {
        let description = self.weather.into_iter().next()?.description;
        Some(LiveObservation {
            city: self.name,
            country: self.sys.country,
            temperature: self.main.temp.round(),
            feels_like: self.main.feels_like.round(),
            temp_min: self.main.temp_min.round(),
            temp_max: self.main.temp_max.round(),
            humidity: self.main.humidity.round(),
            description,
            wind_bearing: self.wind.deg,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
            clouds: self.clouds.all,
            visibility: self.visibility,
        })
    }
}
