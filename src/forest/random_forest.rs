//! Bagged ensembles of [`DecisionTree`]s.

use crate::forest::config::ForestConfig;
use crate::forest::tree::{majority, DecisionTree, Task, TreeParams};
use crate::training::error::TrainingError;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq)]
struct Ensemble {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

/// A random forest that votes on a class index.
///
/// Each tree sees a bootstrap sample of the rows and `sqrt(d)` candidate features per
/// split. The forest predicts the class with the most votes, preferring the lowest
/// class index on a tie.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    ensemble: Ensemble,
    n_classes: usize,
}

/// A random forest that averages real-valued tree outputs.
///
/// Every split considers all features, so the only randomness is the bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor {
    ensemble: Ensemble,
}

impl RandomForestClassifier {
    /// Fits the forest on `x` with class labels in `0..n_classes`.
    ///
    /// # Errors
    ///
    /// * [`TrainingError::InvalidConfig`] if `config` is invalid, `n_classes` is zero, a
    ///   label is out of range or rows differ in width.
    /// * [`TrainingError::ShapeMismatch`] if `x` and `labels` differ in length.
    /// * [`TrainingError::NonFiniteValue`] if a feature is `NaN` or infinite.
    /// * [`TrainingError::InsufficientData`] if `x` is empty.
    pub fn fit(
        x: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        config: &ForestConfig,
    ) -> Result<Self, TrainingError> {
        if n_classes == 0 {
            return Err(TrainingError::InvalidConfig(
                "a classifier needs at least one class".to_string(),
            ));
        }
        if let Some(label) = labels.iter().find(|&&label| label >= n_classes) {
            return Err(TrainingError::InvalidConfig(format!(
                "label {} is outside 0..{}",
                label, n_classes
            )));
        }
        let y: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        let ensemble = Ensemble::fit(
            "random forest classifier",
            x,
            &y,
            Task::Classification { n_classes },
            config,
        )?;
        Ok(Self {
            ensemble,
            n_classes,
        })
    }

    /// Majority vote of the trees for one feature row.
    pub fn predict(&self, row: &[f64]) -> usize {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.ensemble.trees {
            let class = tree.predict(row) as usize;
            votes[class] += 1;
        }
        majority(&votes)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.ensemble.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.ensemble.n_features
    }
}

impl RandomForestRegressor {
    /// Fits the forest on `x` against real-valued targets `y`.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForestClassifier::fit`], minus the class checks.
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &ForestConfig) -> Result<Self, TrainingError> {
        let ensemble = Ensemble::fit("random forest regressor", x, y, Task::Regression, config)?;
        Ok(Self { ensemble })
    }

    /// Mean of the tree outputs for one feature row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.ensemble.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.ensemble.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.ensemble.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.ensemble.n_features
    }
}

impl Ensemble {
    fn fit(
        model: &str,
        x: &[Vec<f64>],
        y: &[f64],
        task: Task,
        config: &ForestConfig,
    ) -> Result<Self, TrainingError> {
        config.validate()?;
        if x.is_empty() {
            return Err(TrainingError::InsufficientData {
                model: model.to_string(),
                required: 1,
                found: 0,
            });
        }
        if x.len() != y.len() {
            return Err(TrainingError::ShapeMismatch {
                rows: x.len(),
                targets: y.len(),
            });
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().find(|row| row.len() != n_features) {
            return Err(TrainingError::InvalidConfig(format!(
                "feature rows must all have {} values, found one with {}",
                n_features,
                row.len()
            )));
        }
        if let Some(row) = x
            .iter()
            .zip(y)
            .position(|(row, target)| !target.is_finite() || row.iter().any(|v| !v.is_finite()))
        {
            return Err(TrainingError::NonFiniteValue { row });
        }

        let max_features = match task {
            Task::Classification { .. } => ((n_features as f64).sqrt() as usize).max(1),
            Task::Regression => n_features,
        };
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features,
        };

        let n = x.len();
        let mut master = ChaCha8Rng::seed_from_u64(config.seed);
        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .map(|_| {
                let mut rng = ChaCha8Rng::seed_from_u64(master.gen());
                let samples: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(x, y, &samples, task, params, &mut rng)
            })
            .collect();

        debug!(
            "Fitted {} with {} trees on {} rows x {} features ({} nodes total)",
            model,
            trees.len(),
            n,
            n_features,
            trees.iter().map(DecisionTree::node_count).sum::<usize>()
        );
        Ok(Self { trees, n_features })
    }
}
