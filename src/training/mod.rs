pub mod autoregressive;
pub mod error;
pub mod rain;
