//! Training and inference of the rain-tomorrow classifier.

use crate::dataset::columns::WeatherColumn;
use crate::dataset::loader::HistoricalDataset;
use crate::encoding::EncodedCategory;
use crate::forest::config::ForestConfig;
use crate::forest::random_forest::RandomForestClassifier;
use crate::training::error::TrainingError;
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Label of the rain-tomorrow class that means rain.
pub const RAIN_LABEL: &str = "Yes";

/// Inputs of the rain classifier for one day, before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainFeatures {
    pub min_temp: f64,
    pub max_temp: f64,
    /// Compass label such as `"SSW"`.
    pub wind_gust_dir: String,
    pub wind_gust_speed: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub temp: f64,
}

/// The classifier's answer, as both the encoded class and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RainPrediction {
    /// A code of the rain-tomorrow encoding. Never `-1`.
    pub code: i64,
    pub label: String,
    pub will_rain: bool,
}

/// Sizes of the train/held-out partition and the accuracy on the held-out rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when no rows were held out.
    pub accuracy: Option<f64>,
}

/// A fitted rain classifier bundled with the encodings it was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedRainClassifier {
    forest: RandomForestClassifier,
    wind_gust_dir: EncodedCategory,
    rain_tomorrow: EncodedCategory,
    holdout: HoldoutReport,
}

impl TrainedRainClassifier {
    /// Encodes the categorical columns, holds out `config.test_fraction` of the rows
    /// (rounded up) through a seeded shuffle and fits the forest on the rest.
    ///
    /// # Errors
    ///
    /// * [`TrainingError::InsufficientData`] if the dataset has fewer than 2 rows.
    /// * [`TrainingError::Dataset`] if a required column is missing or mistyped.
    /// * [`TrainingError::InvalidConfig`] if `config` does not validate.
    pub fn train(
        dataset: &HistoricalDataset,
        config: &ForestConfig,
    ) -> Result<Self, TrainingError> {
        config.validate()?;
        let n = dataset.len();
        if n < 2 {
            return Err(TrainingError::InsufficientData {
                model: "rain classifier".to_string(),
                required: 2,
                found: n,
            });
        }

        let directions = dataset.categorical_column(WeatherColumn::WindGustDir.name())?;
        let rain = dataset.categorical_column(WeatherColumn::RainTomorrow.name())?;
        let wind_gust_dir = EncodedCategory::fit(&directions);
        let rain_tomorrow = EncodedCategory::fit(&rain);
        let direction_codes = wind_gust_dir.transform_all(&directions);
        let labels: Vec<usize> = rain_tomorrow
            .transform_all(&rain)
            .into_iter()
            .map(|code| code as usize)
            .collect();

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(WeatherColumn::RAIN_FEATURES.len());
        for column in WeatherColumn::RAIN_FEATURES {
            if column.is_categorical() {
                columns.push(direction_codes.iter().map(|&code| code as f64).collect());
            } else {
                columns.push(dataset.numeric_column(column.name())?);
            }
        }
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| columns.iter().map(|column| column[i]).collect())
            .collect();

        let (train_idx, test_idx) = holdout_split(n, config.test_fraction, config.seed);
        info!(
            "Training rain classifier on {} rows ({} held out, {} trees)",
            train_idx.len(),
            test_idx.len(),
            config.n_trees
        );
        let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
        let train_y: Vec<usize> = train_idx.iter().map(|&i| labels[i]).collect();
        let forest = RandomForestClassifier::fit(&train_x, &train_y, rain_tomorrow.len(), config)?;

        let accuracy = if test_idx.is_empty() {
            None
        } else {
            let correct = test_idx
                .iter()
                .filter(|&&i| forest.predict(&rows[i]) == labels[i])
                .count();
            Some(correct as f64 / test_idx.len() as f64)
        };
        match accuracy {
            Some(accuracy) => info!("Rain classifier held-out accuracy: {:.3}", accuracy),
            None => info!("Rain classifier trained without a held-out partition"),
        }

        Ok(Self {
            forest,
            wind_gust_dir,
            rain_tomorrow,
            holdout: HoldoutReport {
                train_rows: train_idx.len(),
                test_rows: test_idx.len(),
                accuracy,
            },
        })
    }

    /// Predicts whether it rains tomorrow.
    ///
    /// A wind direction absent from the training data is encoded as `-1` and still
    /// classified.
    pub fn predict(&self, features: &RainFeatures) -> RainPrediction {
        let row = [
            features.min_temp,
            features.max_temp,
            self.wind_gust_dir_code(&features.wind_gust_dir) as f64,
            features.wind_gust_speed,
            features.humidity,
            features.pressure,
            features.temp,
        ];
        let code = self.forest.predict(&row) as i64;
        let label = self.rain_tomorrow.inverse(code).unwrap_or_default().to_string();
        RainPrediction {
            code,
            will_rain: label == RAIN_LABEL,
            label,
        }
    }

    /// Code of a wind-direction label under the training encoding.
    pub fn wind_gust_dir_code(&self, label: &str) -> i64 {
        self.wind_gust_dir.transform(label)
    }

    pub fn wind_gust_dir_encoding(&self) -> &EncodedCategory {
        &self.wind_gust_dir
    }

    pub fn rain_tomorrow_encoding(&self) -> &EncodedCategory {
        &self.rain_tomorrow
    }

    pub fn holdout(&self) -> HoldoutReport {
        self.holdout
    }
}

/// Shuffles `0..n` with a seeded RNG and returns `(train, test)` index sets, the test
/// set holding `ceil(fraction * n)` rows. At least one row always stays in training.
pub(crate) fn holdout_split(n: usize, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    let test_rows = ((fraction * n as f64).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(test_rows);
    (train, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_frame;

    fn dataset(rows: usize) -> Result<HistoricalDataset, Box<dyn std::error::Error>> {
        Ok(HistoricalDataset::clean(synthetic_frame(rows)?)?)
    }

    #[test]
    fn test_holdout_split_sizes() {
        let (train, test) = holdout_split(100, 0.2, 42);
        assert_eq!((train.len(), test.len()), (80, 20));
        let (train, test) = holdout_split(11, 0.2, 42);
        assert_eq!((train.len(), test.len()), (8, 3));
        let (train, test) = holdout_split(2, 0.2, 42);
        assert_eq!((train.len(), test.len()), (1, 1));
        let (train, test) = holdout_split(10, 0.0, 42);
        assert_eq!((train.len(), test.len()), (10, 0));

        let mut all: Vec<usize> = train.into_iter().chain(test).collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_holdout_split_is_seeded() {
        assert_eq!(holdout_split(50, 0.2, 7), holdout_split(50, 0.2, 7));
        assert_ne!(holdout_split(50, 0.2, 7), holdout_split(50, 0.2, 8));
    }

    #[test]
    fn test_trains_on_eighty_percent() -> Result<(), Box<dyn std::error::Error>> {
        let config = ForestConfig::builder().n_trees(20).build();
        let classifier = TrainedRainClassifier::train(&dataset(100)?, &config)?;
        let holdout = classifier.holdout();
        assert_eq!(holdout.train_rows, 80);
        assert_eq!(holdout.test_rows, 20);
        let accuracy = holdout.accuracy.ok_or("no accuracy")?;
        assert!((0.0..=1.0).contains(&accuracy));
        Ok(())
    }

    #[test]
    fn test_prediction_is_a_known_class() -> Result<(), Box<dyn std::error::Error>> {
        let config = ForestConfig::builder().n_trees(10).build();
        let classifier = TrainedRainClassifier::train(&dataset(60)?, &config)?;
        let encoding = classifier.rain_tomorrow_encoding();

        for (direction, humidity) in [("SSW", 95.0), ("Nowhere", 20.0), ("N", 60.0)] {
            let prediction = classifier.predict(&RainFeatures {
                min_temp: 9.0,
                max_temp: 21.0,
                wind_gust_dir: direction.to_string(),
                wind_gust_speed: 40.0,
                humidity,
                pressure: 1003.0,
                temp: 15.0,
            });
            assert!(prediction.code >= 0 && (prediction.code as usize) < encoding.len());
            assert_eq!(encoding.inverse(prediction.code), Some(prediction.label.as_str()));
            assert_eq!(prediction.will_rain, prediction.label == "Yes");
        }
        assert_eq!(classifier.wind_gust_dir_code("Nowhere"), -1);
        Ok(())
    }

    #[test]
    fn test_same_data_same_classifier() -> Result<(), Box<dyn std::error::Error>> {
        let config = ForestConfig::builder().n_trees(10).build();
        let data = dataset(40)?;
        assert_eq!(
            TrainedRainClassifier::train(&data, &config)?,
            TrainedRainClassifier::train(&data, &config)?
        );
        Ok(())
    }

    #[test]
    fn test_one_row_is_not_enough() -> Result<(), Box<dyn std::error::Error>> {
        let result = TrainedRainClassifier::train(&dataset(1)?, &ForestConfig::default());
        assert!(matches!(
            result,
            Err(TrainingError::InsufficientData { required: 2, found: 1, .. })
        ));
        Ok(())
    }
}
