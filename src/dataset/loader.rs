//! Loading and cleaning of the historical weather log.

use crate::dataset::columns::WeatherColumn;
use crate::dataset::error::DatasetLoadError;
use crate::dataset::record::HistoricalRecord;
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Field values read as a missing measurement. Matches the markers pandas treats as
/// missing by default, so logs exported from either tool load the same rows.
const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A handle to the historical weather log.
///
/// The handle is resolved by [`HistoricalDataset::load`]; it is cheap to clone, so it can
/// be moved into a blocking task for each training run.
///
/// # Examples
///
/// ```
/// use weather_predict::DatasetSource;
///
/// let from_disk = DatasetSource::csv_file("data/weather.csv");
/// let in_memory = DatasetSource::csv_bytes(b"MinTemp,MaxTemp\n8.0,24.3\n".to_vec());
/// # let _ = (from_disk, in_memory);
/// ```
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// A CSV file with a header row.
    CsvFile(PathBuf),
    /// CSV content (with a header row) already held in memory.
    CsvBytes(Arc<[u8]>),
    /// An already-loaded table. It is still cleaned on load.
    Frame(DataFrame),
}

impl DatasetSource {
    pub fn csv_file(path: impl Into<PathBuf>) -> Self {
        DatasetSource::CsvFile(path.into())
    }

    pub fn csv_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        DatasetSource::CsvBytes(bytes.into())
    }
}

/// A cleaned historical weather log.
///
/// Holding a `HistoricalDataset` guarantees that no row has a missing field and that
/// no two rows are identical. Row order is the order of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDataset {
    frame: DataFrame,
}

impl HistoricalDataset {
    /// Reads the source and cleans it.
    ///
    /// # Errors
    ///
    /// * [`DatasetLoadError::CsvRead`] / [`DatasetLoadError::CsvParse`] if the CSV cannot be read.
    /// * [`DatasetLoadError::NoUsableColumns`] if the table has no columns.
    /// * [`DatasetLoadError::Cleaning`] if polars fails while dropping rows.
    pub fn load(source: &DatasetSource) -> Result<Self, DatasetLoadError> {
        let raw = match source {
            DatasetSource::CsvFile(path) => {
                info!("Reading historical weather log from {:?}", path);
                csv_options()
                    .try_into_reader_with_file_path(Some(path.clone()))
                    .map_err(|e| DatasetLoadError::CsvRead(path.clone(), e))?
                    .finish()
                    .map_err(|e| DatasetLoadError::CsvRead(path.clone(), e))?
            }
            DatasetSource::CsvBytes(bytes) => {
                info!("Parsing {} bytes of historical weather log", bytes.len());
                csv_options()
                    .into_reader_with_file_handle(Cursor::new(Arc::clone(bytes)))
                    .finish()
                    .map_err(DatasetLoadError::CsvParse)?
            }
            DatasetSource::Frame(frame) => frame.clone(),
        };
        Self::clean(raw)
    }

    /// Drops rows with any missing field, then collapses exact duplicates to their
    /// first occurrence. A `NaN` or infinite float counts as missing. Cleaning an
    /// already clean frame returns it unchanged.
    pub fn clean(frame: DataFrame) -> Result<Self, DatasetLoadError> {
        if frame.width() == 0 {
            return Err(DatasetLoadError::NoUsableColumns);
        }
        let raw_rows = frame.height();
        let finite = frame
            .get_columns()
            .iter()
            .filter(|column| column.dtype().is_float())
            .map(|column| col(column.name().clone()).is_finite())
            .reduce(|all, next| all.and(next));
        let mut lazy = frame.lazy().drop_nulls(None);
        if let Some(finite) = finite {
            lazy = lazy.filter(finite);
        }
        let frame = lazy
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
            .map_err(DatasetLoadError::Cleaning)?;
        info!(
            "Cleaned historical weather log: {} of {} rows kept",
            frame.height(),
            raw_rows
        );
        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Reads a column as `f64` values, casting integer columns.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, DatasetLoadError> {
        let values = self
            .column(name)?
            .strict_cast(&DataType::Float64)
            .map_err(|e| invalid_column(name, "numeric", e))?;
        let values = values
            .f64()
            .map_err(|e| invalid_column(name, "numeric", e))?;
        debug!("Read {} numeric values from column '{}'", values.len(), name);
        values
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.ok_or_else(|| missing_value(name, row)))
            .collect()
    }

    /// Reads a column as owned string labels.
    pub fn categorical_column(&self, name: &str) -> Result<Vec<String>, DatasetLoadError> {
        let labels = self
            .column(name)?
            .cast(&DataType::String)
            .map_err(|e| invalid_column(name, "text", e))?;
        let labels = labels.str().map_err(|e| invalid_column(name, "text", e))?;
        labels
            .into_iter()
            .enumerate()
            .map(|(row, label)| {
                label
                    .map(str::to_string)
                    .ok_or_else(|| missing_value(name, row))
            })
            .collect()
    }

    /// Collects the model columns of every row into [`HistoricalRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetLoadError::MissingColumn`] if any of [`WeatherColumn::ALL`] is absent.
    pub fn records(&self) -> Result<Vec<HistoricalRecord>, DatasetLoadError> {
        let min_temp = self.numeric_column(WeatherColumn::MinTemp.name())?;
        let max_temp = self.numeric_column(WeatherColumn::MaxTemp.name())?;
        let wind_gust_dir = self.categorical_column(WeatherColumn::WindGustDir.name())?;
        let wind_gust_speed = self.numeric_column(WeatherColumn::WindGustSpeed.name())?;
        let humidity = self.numeric_column(WeatherColumn::Humidity.name())?;
        let pressure = self.numeric_column(WeatherColumn::Pressure.name())?;
        let temp = self.numeric_column(WeatherColumn::Temp.name())?;
        let rain_tomorrow = self.categorical_column(WeatherColumn::RainTomorrow.name())?;

        Ok(wind_gust_dir
            .into_iter()
            .zip(rain_tomorrow)
            .enumerate()
            .map(|(i, (wind_gust_dir, rain_tomorrow))| HistoricalRecord {
                min_temp: min_temp[i],
                max_temp: max_temp[i],
                wind_gust_dir,
                wind_gust_speed: wind_gust_speed[i],
                humidity: humidity[i],
                pressure: pressure[i],
                temp: temp[i],
                rain_tomorrow,
            })
            .collect())
    }

    fn column(&self, name: &str) -> Result<&Column, DatasetLoadError> {
        self.frame
            .column(name)
            .map_err(|_| DatasetLoadError::MissingColumn {
                column: name.to_string(),
            })
    }
}

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|options| {
            options.with_null_values(Some(NullValues::AllColumns(
                MISSING_MARKERS.iter().map(|&marker| marker.into()).collect(),
            )))
        })
}

fn invalid_column(name: &str, expected: &'static str, source: PolarsError) -> DatasetLoadError {
    DatasetLoadError::InvalidColumn {
        column: name.to_string(),
        expected,
        source,
    }
}

fn missing_value(name: &str, row: usize) -> DatasetLoadError {
    DatasetLoadError::MissingValue {
        column: name.to_string(),
        row,
    }
}
