//! Lag-1 autoregressive regressors, one per numeric column.

use crate::dataset::columns::WeatherColumn;
use crate::dataset::loader::HistoricalDataset;
use crate::forest::config::ForestConfig;
use crate::forest::random_forest::RandomForestRegressor;
use crate::training::error::TrainingError;
use log::info;

/// Pairs every value with its successor: `(v[i], v[i + 1])` for `i` in `0..n - 1`.
///
/// # Examples
///
/// ```
/// use weather_predict::lag_pairs;
///
/// assert_eq!(
///     lag_pairs(&[10.0, 12.0, 9.0, 15.0]),
///     vec![(10.0, 12.0), (12.0, 9.0), (9.0, 15.0)]
/// );
/// assert!(lag_pairs(&[10.0]).is_empty());
/// ```
pub fn lag_pairs(values: &[f64]) -> Vec<(f64, f64)> {
    values.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

/// A regressor predicting the next value of one column from its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedRegressor {
    column: WeatherColumn,
    forest: RandomForestRegressor,
    pairs: usize,
}

impl TrainedRegressor {
    /// Fits a forest on every lag-1 pair of `column`, in dataset row order.
    ///
    /// # Errors
    ///
    /// * [`TrainingError::InsufficientData`] if the dataset has fewer than 2 rows.
    /// * [`TrainingError::Dataset`] if the column is missing or not numeric.
    pub fn train(
        dataset: &HistoricalDataset,
        column: WeatherColumn,
        config: &ForestConfig,
    ) -> Result<Self, TrainingError> {
        let values = dataset.numeric_column(column.name())?;
        if values.len() < 2 {
            return Err(TrainingError::InsufficientData {
                model: format!("{} regressor", column),
                required: 2,
                found: values.len(),
            });
        }
        let (x, y): (Vec<Vec<f64>>, Vec<f64>) = lag_pairs(&values)
            .into_iter()
            .map(|(current, next)| (vec![current], next))
            .unzip();

        let forest = RandomForestRegressor::fit(&x, &y, config)?;
        info!("Trained {} regressor on {} lag pairs", column, y.len());
        Ok(Self {
            column,
            forest,
            pairs: y.len(),
        })
    }

    pub fn predict_next(&self, current: f64) -> f64 {
        self.forest.predict(&[current])
    }

    pub fn column(&self) -> WeatherColumn {
        self.column
    }

    /// Number of lag pairs the forest was fitted on.
    pub fn pairs(&self) -> usize {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_frame;
    use polars::prelude::df;

    #[test]
    fn test_lag_pairs() {
        assert_eq!(
            lag_pairs(&[10.0, 12.0, 9.0, 15.0]),
            vec![(10.0, 12.0), (12.0, 9.0), (9.0, 15.0)]
        );
        assert!(lag_pairs(&[]).is_empty());
    }

    #[test]
    fn test_regressor_trains_on_every_pair() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = HistoricalDataset::clean(synthetic_frame(30)?)?;
        let config = ForestConfig::builder().n_trees(10).build();
        let regressor = TrainedRegressor::train(&dataset, WeatherColumn::Temp, &config)?;
        assert_eq!(regressor.pairs(), 29);
        assert_eq!(regressor.column(), WeatherColumn::Temp);

        let next = regressor.predict_next(15.0);
        let temps = dataset.numeric_column("Temp")?;
        let lowest = temps.iter().cloned().fold(f64::INFINITY, f64::min);
        let highest = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(next >= lowest && next <= highest);
        Ok(())
    }

    #[test]
    fn test_single_row_is_insufficient() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = HistoricalDataset::clean(synthetic_frame(1)?)?;
        let result =
            TrainedRegressor::train(&dataset, WeatherColumn::Humidity, &ForestConfig::default());
        assert!(matches!(
            result,
            Err(TrainingError::InsufficientData { found: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_nan_readings_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "Temp" => [1.0, f64::NAN, 5.0, f64::INFINITY, 3.0]
        )?;
        let dataset = HistoricalDataset::clean(frame)?;
        let config = ForestConfig::builder().n_trees(5).build();
        let regressor = TrainedRegressor::train(&dataset, WeatherColumn::Temp, &config)?;
        assert_eq!(regressor.pairs(), 2);
        assert!(regressor.predict_next(2.0).is_finite());
        Ok(())
    }

    #[test]
    fn test_text_column_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dataset = HistoricalDataset::clean(synthetic_frame(5)?)?;
        let result =
            TrainedRegressor::train(&dataset, WeatherColumn::WindGustDir, &ForestConfig::default());
        assert!(matches!(result, Err(TrainingError::Dataset(_))));
        Ok(())
    }
}
