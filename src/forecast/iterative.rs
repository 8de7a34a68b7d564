use crate::training::autoregressive::TrainedRegressor;

/// Number of hourly steps in a forecast trajectory.
pub const DEFAULT_HORIZON: usize = 5;

/// Applies `step` to its own output `horizon` times, starting from `seed`.
///
/// Returns `[v1, ..., vH]` where `v0 = seed` and `vk = step(vk-1)`; the seed itself is
/// not part of the output. Values are neither clamped nor checked.
///
/// # Examples
///
/// ```
/// use weather_predict::iterate_forecast;
///
/// let doubled = iterate_forecast(1.0, 4, |v| v * 2.0);
/// assert_eq!(doubled, vec![2.0, 4.0, 8.0, 16.0]);
/// ```
pub fn iterate_forecast(seed: f64, horizon: usize, mut step: impl FnMut(f64) -> f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(horizon);
    let mut current = seed;
    for _ in 0..horizon {
        current = step(current);
        values.push(current);
    }
    values
}

impl TrainedRegressor {
    /// Rolls the regressor forward `horizon` steps from `seed`.
    pub fn forecast(&self, seed: f64, horizon: usize) -> Vec<f64> {
        iterate_forecast(seed, horizon, |current| self.predict_next(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::columns::WeatherColumn;
    use crate::dataset::loader::HistoricalDataset;
    use crate::forest::config::ForestConfig;
    use crate::test_support::synthetic_frame;

    #[test]
    fn test_seed_is_excluded() {
        let values = iterate_forecast(10.0, 3, |v| v + 1.0);
        assert_eq!(values, vec![11.0, 12.0, 13.0]);
        assert!(iterate_forecast(10.0, 0, |v| v + 1.0).is_empty());
    }

    #[test]
    fn test_no_clamping() {
        let values = iterate_forecast(50.0, DEFAULT_HORIZON, |v| v * 3.0);
        assert_eq!(values.last(), Some(&12150.0));
    }

    #[test]
    fn test_regressor_forecast_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = HistoricalDataset::clean(synthetic_frame(40)?)?;
        let config = ForestConfig::builder().n_trees(10).build();
        let regressor = TrainedRegressor::train(&dataset, WeatherColumn::Humidity, &config)?;

        let first = regressor.forecast(72.0, DEFAULT_HORIZON);
        let second = regressor.forecast(72.0, DEFAULT_HORIZON);
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
        assert_eq!(first[0], regressor.predict_next(72.0));
        assert_eq!(first[1], regressor.predict_next(first[0]));
        Ok(())
    }
}
