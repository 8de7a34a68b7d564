//! Trained model generations and the store that publishes them.

use crate::dataset::columns::WeatherColumn;
use crate::dataset::loader::{DatasetSource, HistoricalDataset};
use crate::error::WeatherPredictError;
use crate::forecast::assembler::{assemble, ForecastResult};
use crate::forecast::iterative::DEFAULT_HORIZON;
use crate::forest::config::ForestConfig;
use crate::live::observation::LiveObservation;
use crate::training::autoregressive::TrainedRegressor;
use crate::training::error::TrainingError;
use crate::training::rain::TrainedRainClassifier;
use chrono::{DateTime, FixedOffset};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Every model a forecast needs, trained together from one cleaned dataset.
///
/// A `ForecastModel` never changes after training. Newer data produces a new model with
/// a higher generation number instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastModel {
    generation: u64,
    rain: TrainedRainClassifier,
    temperature: TrainedRegressor,
    humidity: TrainedRegressor,
    trained_rows: usize,
}

impl ForecastModel {
    /// Trains the rain classifier and the temperature and humidity regressors.
    ///
    /// # Errors
    ///
    /// Returns the first [`TrainingError`] of any of the three models.
    pub fn train(
        dataset: &HistoricalDataset,
        config: &ForestConfig,
        generation: u64,
    ) -> Result<Self, TrainingError> {
        info!(
            "Training forecast model generation {} on {} rows",
            generation,
            dataset.len()
        );
        let rain = TrainedRainClassifier::train(dataset, config)?;
        let temperature = TrainedRegressor::train(dataset, WeatherColumn::Temp, config)?;
        let humidity = TrainedRegressor::train(dataset, WeatherColumn::Humidity, config)?;
        Ok(Self {
            generation,
            rain,
            temperature,
            humidity,
            trained_rows: dataset.len(),
        })
    }

    /// Forecasts [`DEFAULT_HORIZON`] hours ahead of `now` for `observation`.
    pub fn predict(
        &self,
        observation: LiveObservation,
        now: DateTime<FixedOffset>,
    ) -> Result<ForecastResult, WeatherPredictError> {
        assemble(observation, self, now, DEFAULT_HORIZON)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rain(&self) -> &TrainedRainClassifier {
        &self.rain
    }

    pub fn temperature(&self) -> &TrainedRegressor {
        &self.temperature
    }

    pub fn humidity(&self) -> &TrainedRegressor {
        &self.humidity
    }

    /// Rows of the cleaned dataset the model was trained from.
    pub fn trained_rows(&self) -> usize {
        self.trained_rows
    }
}

/// Holds the latest published [`ForecastModel`].
///
/// Readers get a shared `Arc` of the current generation and never wait on training.
/// Training runs on the blocking pool, one generation at a time; a failed training
/// leaves the published generation in place. A training run that has started always
/// publishes its model, even if the caller stops waiting for it.
pub struct ModelStore {
    dataset: DatasetSource,
    config: ForestConfig,
    current: Arc<RwLock<Option<Arc<ForecastModel>>>>,
    // Held by the blocking task for the whole of a training run.
    writer: Arc<Mutex<()>>,
}

impl ModelStore {
    pub fn new(dataset: DatasetSource, config: ForestConfig) -> Self {
        Self {
            dataset,
            config,
            current: Arc::new(RwLock::new(None)),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// The published generation, if any.
    pub async fn current(&self) -> Option<Arc<ForecastModel>> {
        self.current.read().await.clone()
    }

    /// Returns the published generation, training the first one if there is none yet.
    ///
    /// Concurrent callers on an empty store wait for a single training run and all get
    /// the same generation.
    pub async fn get_or_train(&self) -> Result<Arc<ForecastModel>, WeatherPredictError> {
        if let Some(model) = self.current().await {
            return Ok(model);
        }

        let writer = Arc::clone(&self.writer).lock_owned().await;
        // Another caller may have published while we waited for the writer lock.
        if let Some(model) = self.current().await {
            debug!("Using generation {} trained by a concurrent request", model.generation());
            return Ok(model);
        }
        self.train_generation(writer).await
    }

    /// Trains and publishes a new generation from the current contents of the dataset.
    pub async fn refresh(&self) -> Result<Arc<ForecastModel>, WeatherPredictError> {
        let writer = Arc::clone(&self.writer).lock_owned().await;
        self.train_generation(writer).await
    }

    async fn train_generation(
        &self,
        writer: OwnedMutexGuard<()>,
    ) -> Result<Arc<ForecastModel>, WeatherPredictError> {
        let source = self.dataset.clone();
        let config = self.config.clone();
        let current = Arc::clone(&self.current);

        let model = tokio::task::spawn_blocking(move || {
            let _writer = writer;
            let generation = current
                .blocking_read()
                .as_ref()
                .map_or(1, |model| model.generation() + 1);
            let dataset = HistoricalDataset::load(&source)?;
            let model = Arc::new(ForecastModel::train(&dataset, &config, generation)?);

            *current.blocking_write() = Some(Arc::clone(&model));
            info!(
                "Published forecast model generation {} ({} rows)",
                generation,
                model.trained_rows()
            );
            Ok::<_, WeatherPredictError>(model)
        })
        .await??;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_frame;
    use polars::prelude::{CsvWriter, SerWriter};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn small_config() -> ForestConfig {
        ForestConfig::builder().n_trees(5).build()
    }

    #[tokio::test]
    async fn test_get_or_train_trains_once() -> Result<(), Box<dyn std::error::Error>> {
        let store = ModelStore::new(DatasetSource::Frame(synthetic_frame(30)?), small_config());
        assert!(store.current().await.is_none());

        let (first, second) = tokio::join!(store.get_or_train(), store.get_or_train());
        let (first, second) = (first?, second?);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.generation(), 1);
        assert_eq!(first.trained_rows(), 30);

        let again = store.get_or_train().await?;
        assert!(Arc::ptr_eq(&first, &again));
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_publishes_next_generation() -> Result<(), Box<dyn std::error::Error>> {
        let store = ModelStore::new(DatasetSource::Frame(synthetic_frame(30)?), small_config());
        let first = store.get_or_train().await?;
        let second = store.refresh().await?;
        assert_eq!(second.generation(), 2);
        assert!(!Arc::ptr_eq(&first, &second));

        let current = store.current().await.ok_or("nothing published")?;
        assert!(Arc::ptr_eq(&current, &second));
        // Readers holding the old generation keep a usable model.
        assert_eq!(first.generation(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_generation() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        let mut frame = synthetic_frame(30)?;
        CsvWriter::new(&mut file).finish(&mut frame)?;
        file.flush()?;

        let store = ModelStore::new(DatasetSource::csv_file(file.path()), small_config());
        let first = store.get_or_train().await?;

        // Leave only the header: there is nothing left to train on.
        let header = "MinTemp,MaxTemp,WindGustDir,WindGustSpeed,Humidity,Pressure,Temp,RainTomorrow\n";
        std::fs::write(file.path(), header)?;
        let result = store.refresh().await;
        assert!(matches!(
            result,
            Err(WeatherPredictError::Training(_) | WeatherPredictError::DatasetLoad(_))
        ));

        let current = store.current().await.ok_or("nothing published")?;
        assert!(Arc::ptr_eq(&current, &first));

        // The failed run did not use up a generation number.
        std::fs::write(file.path(), {
            let mut buffer = Vec::new();
            CsvWriter::new(&mut buffer).finish(&mut synthetic_frame(20)?)?;
            buffer
        })?;
        let second = store.refresh().await?;
        assert_eq!(second.generation(), 2);
        assert_eq!(second.trained_rows(), 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_abandoned_refresh_still_publishes() -> Result<(), Box<dyn std::error::Error>> {
        let store = ModelStore::new(DatasetSource::Frame(synthetic_frame(30)?), small_config());

        // Stop waiting as soon as the training run is underway.
        let abandoned = tokio::time::timeout(Duration::from_millis(1), store.refresh()).await;
        if let Ok(finished) = abandoned {
            assert_eq!(finished?.generation(), 1);
        }

        // Waits for the abandoned run, which published generation 1.
        let next = store.refresh().await?;
        assert_eq!(next.generation(), 2);
        let current = store.current().await.ok_or("nothing published")?;
        assert!(Arc::ptr_eq(&current, &next));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_dataset_fails_without_publishing() {
        let store = ModelStore::new(
            DatasetSource::csv_file("/definitely/not/here/weather.csv"),
            small_config(),
        );
        let result = store.get_or_train().await;
        assert!(matches!(result, Err(WeatherPredictError::DatasetLoad(_))));
        assert!(store.current().await.is_none());
    }
}
