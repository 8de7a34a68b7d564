//! CART decision trees grown on a bootstrap sample of a feature matrix.

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Task {
    /// Targets are class indices `0..n_classes`; splits minimize weighted Gini impurity.
    Classification { n_classes: usize },
    /// Targets are real values; splits minimize the summed squared error.
    Regression,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    /// Majority class index (classification) or mean target (regression).
    Leaf { value: f64 },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of non-constant features examined per node.
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    task: Task,
    params: TreeParams,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grows a tree on the rows listed in `samples`. Rows may repeat (bootstrap).
    ///
    /// `x` must have at least one row and every row the same width.
    pub(crate) fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        samples: &[usize],
        task: Task,
        params: TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            task,
            params,
            nodes: Vec::new(),
        };
        let mut samples = samples.to_vec();
        builder.grow(&mut samples, 0, rng);
        DecisionTree {
            nodes: builder.nodes,
        }
    }

    pub(crate) fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        fn depth_of(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + depth_of(nodes, *left).max(depth_of(nodes, *right))
                }
            }
        }
        depth_of(&self.nodes, 0)
    }
}

impl TreeBuilder<'_> {
    /// Appends the subtree for `samples` and returns the index of its root.
    fn grow(&mut self, samples: &mut [usize], depth: usize, rng: &mut ChaCha8Rng) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(samples),
        });

        if self.should_stop(samples, depth) {
            return id;
        }
        let Some(split) = self.best_split(samples, rng) else {
            return id;
        };

        let x = self.x;
        let mut mid = 0;
        for j in 0..samples.len() {
            if x[samples[j]][split.feature] <= split.threshold {
                samples.swap(mid, j);
                mid += 1;
            }
        }
        // A split that sends every sample one way cannot make progress.
        if mid == 0 || mid == samples.len() {
            return id;
        }
        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1, rng);
        let right = self.grow(right_samples, depth + 1, rng);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn should_stop(&self, samples: &[usize], depth: usize) -> bool {
        if samples.len() < self.params.min_samples_split {
            return true;
        }
        if self.params.max_depth.is_some_and(|max| depth >= max) {
            return true;
        }
        let first = self.y[samples[0]];
        samples.iter().all(|&i| self.y[i] == first)
    }

    fn leaf_value(&self, samples: &[usize]) -> f64 {
        match self.task {
            Task::Regression => {
                let sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
                sum / samples.len() as f64
            }
            Task::Classification { n_classes } => {
                let counts = self.class_counts(samples.iter().copied(), n_classes);
                majority(&counts) as f64
            }
        }
    }

    fn class_counts(&self, samples: impl Iterator<Item = usize>, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for i in samples {
            counts[self.y[i] as usize] += 1;
        }
        counts
    }

    /// Examines features in random order until `max_features` non-constant ones have
    /// been scanned, keeping the split with the lowest child impurity.
    fn best_split(&self, samples: &[usize], rng: &mut ChaCha8Rng) -> Option<SplitCandidate> {
        let n_features = self.x[samples[0]].len();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut informative = 0;
        let mut order = samples.to_vec();
        for feature in features {
            if informative >= self.params.max_features {
                break;
            }
            order.sort_by_key(|&i| OrderedFloat(self.x[i][feature]));
            let lowest = self.x[order[0]][feature];
            let highest = self.x[order[order.len() - 1]][feature];
            if lowest == highest {
                continue;
            }
            informative += 1;

            let candidate = match self.task {
                Task::Regression => self.scan_regression(feature, &order),
                Task::Classification { n_classes } => {
                    self.scan_classification(feature, &order, n_classes)
                }
            };
            if let Some(candidate) = candidate {
                if best.map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    fn scan_regression(&self, feature: usize, order: &[usize]) -> Option<SplitCandidate> {
        let n = order.len();
        let total_sum: f64 = order.iter().map(|&i| self.y[i]).sum();
        let total_sq: f64 = order.iter().map(|&i| self.y[i] * self.y[i]).sum();

        let mut best: Option<SplitCandidate> = None;
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 0..n - 1 {
            let target = self.y[order[k]];
            left_sum += target;
            left_sq += target * target;

            let Some(threshold) = self.threshold_between(feature, order, k) else {
                continue;
            };
            let n_left = (k + 1) as f64;
            let n_right = (n - k - 1) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let impurity = (left_sq - left_sum * left_sum / n_left)
                + (right_sq - right_sum * right_sum / n_right);
            if best.map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
        best
    }

    fn scan_classification(
        &self,
        feature: usize,
        order: &[usize],
        n_classes: usize,
    ) -> Option<SplitCandidate> {
        let n = order.len();
        let total = self.class_counts(order.iter().copied(), n_classes);
        let mut left = vec![0usize; n_classes];

        let mut best: Option<SplitCandidate> = None;
        for k in 0..n - 1 {
            left[self.y[order[k]] as usize] += 1;

            let Some(threshold) = self.threshold_between(feature, order, k) else {
                continue;
            };
            let n_left = (k + 1) as f64;
            let n_right = (n - k - 1) as f64;
            let left_sq: f64 = left.iter().map(|&c| (c * c) as f64).sum();
            let right_sq: f64 = total
                .iter()
                .zip(&left)
                .map(|(&t, &l)| ((t - l) * (t - l)) as f64)
                .sum();
            // n * gini(node) summed over both children.
            let impurity = (n_left - left_sq / n_left) + (n_right - right_sq / n_right);
            if best.map_or(true, |b| impurity < b.impurity) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
        best
    }

    /// Threshold separating `order[..=k]` from `order[k + 1..]`, if the two sides hold
    /// distinct values and both respect `min_samples_leaf`.
    fn threshold_between(&self, feature: usize, order: &[usize], k: usize) -> Option<f64> {
        let n_left = k + 1;
        let n_right = order.len() - n_left;
        if n_left < self.params.min_samples_leaf || n_right < self.params.min_samples_leaf {
            return None;
        }
        let current = self.x[order[k]][feature];
        let next = self.x[order[k + 1]][feature];
        if !current.is_finite() || !next.is_finite() || next <= current {
            return None;
        }
        let threshold = current + (next - current) / 2.0;
        // Adjacent floats can make the midpoint round up to `next`.
        Some(if threshold >= next { current } else { threshold })
    }
}

/// Index of the largest count; ties go to the lowest index.
pub(crate) fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (index, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = index;
        }
    }
    best
}
