pub mod error;
pub mod observation;
pub mod open_weather;
