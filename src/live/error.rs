use thiserror::Error;

#[derive(Debug, Error)]
pub enum LiveWeatherError {
    #[error("No current weather found for city '{city}'")]
    CityNotFound { city: String },

    #[error("Current weather request for '{city}' timed out")]
    Timeout {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Current weather request for '{city}' failed with status {status}")]
    HttpStatus {
        city: String,
        status: reqwest::StatusCode,
    },

    #[error("Network request for the current weather of '{city}' failed")]
    NetworkRequest {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Environment variable '{0}' with the OpenWeatherMap API key is not set")]
    MissingApiKey(&'static str),
}
