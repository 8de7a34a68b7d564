use crate::training::error::TrainingError;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Hyperparameters shared by the rain classifier and the autoregressive regressors.
///
/// The defaults are 100 trees, seed 42, fully grown trees and a 20% held-out partition
/// for the classifier.
///
/// # Examples
///
/// ```
/// use weather_predict::ForestConfig;
///
/// let config = ForestConfig::builder().n_trees(25).max_depth(8).build();
/// assert_eq!(config.n_trees, 25);
/// assert_eq!(config.seed, 42);
/// assert_eq!(ForestConfig::default().n_trees, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ForestConfig {
    /// Number of bagged trees per forest.
    #[builder(default = 100)]
    pub n_trees: usize,
    /// Seed for the held-out shuffle and every bootstrap sample.
    #[builder(default = 42)]
    pub seed: u64,
    /// Maximum depth of a tree; `None` grows each tree until its leaves are pure.
    pub max_depth: Option<usize>,
    #[builder(default = 2)]
    pub min_samples_split: usize,
    #[builder(default = 1)]
    pub min_samples_leaf: usize,
    /// Share of rows held out from rain classifier training.
    #[builder(default = 0.2)]
    pub test_fraction: f64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig::builder().build()
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.n_trees == 0 {
            return Err(TrainingError::InvalidConfig(
                "n_trees must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(TrainingError::InvalidConfig(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainingError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(TrainingError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(TrainingError::InvalidConfig(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }
}
