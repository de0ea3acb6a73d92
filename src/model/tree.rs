//! CART regression tree with squared-error splits.
//!
//! Nodes live in a flat arena. Children are always pushed after their parent,
//! so every child index is strictly greater than its parent's; inference walks
//! forward and always terminates.

use crate::error::ModelError;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// A node of a fitted tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Predicts the mean target of the training samples that reached it.
    Leaf { value: f64, n_samples: usize },
    /// Samples with `x[feature] <= threshold` go `left`, others `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Growth limits for a single tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Root is depth 0; `None` grows until the other limits stop it.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split; `None` means all.
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// A fitted regression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Samples going left once sorted by `feature`.
    n_left: usize,
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    config: &'a TreeConfig,
    nodes: Vec<Node>,
    /// (feature value, target) pairs reused across split searches.
    scratch: Vec<(f64, f64)>,
}

impl<'a> Grower<'a> {
    fn grow(&mut self, samples: &mut [usize], depth: usize, rng: &mut StdRng) -> usize {
        let (x, y) = (self.x, self.y);
        let n = samples.len();
        let sum: f64 = samples.iter().map(|&s| y[s]).sum();

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: sum / n as f64,
            n_samples: n,
        });

        if self.is_terminal(samples, depth) {
            return id;
        }
        let Some(split) = self.best_split(samples, sum, rng) else {
            return id;
        };

        let f = split.feature;
        samples.sort_by(|&a, &b| x[[a, f]].total_cmp(&x[[b, f]]));
        let (left_samples, right_samples) = samples.split_at_mut(split.n_left);

        let left = self.grow(left_samples, depth + 1, rng);
        let right = self.grow(right_samples, depth + 1, rng);
        self.nodes[id] = Node::Split {
            feature: f,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    fn is_terminal(&self, samples: &[usize], depth: usize) -> bool {
        let n = samples.len();
        if self.config.max_depth.is_some_and(|d| depth >= d)
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
        {
            return true;
        }
        let first = self.y[samples[0]];
        samples.iter().all(|&s| self.y[s] == first)
    }

    /// Split maximising `sum_l²/n_l + sum_r²/n_r`, i.e. minimising the
    /// children's summed squared error.
    fn best_split(&mut self, samples: &[usize], sum: f64, rng: &mut StdRng) -> Option<SplitCandidate> {
        let (x, y) = (self.x, self.y);
        let n = samples.len();
        let n_features = x.ncols();
        let min_leaf = self.config.min_samples_leaf;

        let features: Vec<usize> = match self.config.max_features {
            Some(k) if k < n_features => index::sample(rng, n_features, k).into_vec(),
            _ => (0..n_features).collect(),
        };

        let mut best: Option<SplitCandidate> = None;
        let mut best_score = sum * sum / n as f64;

        for f in features {
            self.scratch.clear();
            self.scratch.extend(samples.iter().map(|&s| (x[[s, f]], y[s])));
            self.scratch.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for i in 1..n {
                left_sum += self.scratch[i - 1].1;
                if i < min_leaf || n - i < min_leaf {
                    continue;
                }
                let (lo, hi) = (self.scratch[i - 1].0, self.scratch[i].0);
                if lo >= hi {
                    continue;
                }
                let right_sum = sum - left_sum;
                let score = left_sum * left_sum / i as f64 + right_sum * right_sum / (n - i) as f64;
                if score > best_score {
                    best_score = score;
                    let mut threshold = lo / 2.0 + hi / 2.0;
                    if threshold >= hi || !threshold.is_finite() {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature: f,
                        threshold,
                        n_left: i,
                    });
                }
            }
        }
        best
    }
}

impl RegressionTree {
    /// Fit on the rows of `x` listed in `samples` (duplicates allowed, as
    /// produced by bootstrapping).
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        samples: &[usize],
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Result<Self, ModelError> {
        if samples.is_empty() {
            return Err(ModelError::EmptyData(
                "cannot fit a tree on zero samples".to_string(),
            ));
        }
        if config.min_samples_split < 2 || config.min_samples_leaf < 1 {
            return Err(ModelError::InvalidParameter(format!(
                "min_samples_split must be >= 2 and min_samples_leaf >= 1, got {} and {}",
                config.min_samples_split, config.min_samples_leaf
            )));
        }
        if let Some(&bad) = samples.iter().find(|&&s| s >= x.nrows() || s >= y.len()) {
            return Err(ModelError::InvalidParameter(format!(
                "sample index {bad} out of bounds"
            )));
        }

        let mut grower = Grower {
            x,
            y,
            config,
            nodes: Vec::new(),
            scratch: Vec::with_capacity(samples.len()),
        };
        let mut samples = samples.to_vec();
        grower.grow(&mut samples, 0, rng);

        Ok(Self {
            nodes: grower.nodes,
            n_features: x.ncols(),
        })
    }

    /// Predict one row. The caller guarantees `row.len() == n_features`.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path (a lone leaf has depth 0).
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                depths[*left] = depths[id] + 1;
                depths[*right] = depths[id] + 1;
                max = max.max(depths[id] + 1);
            }
        }
        max
    }

    /// Structural check for trees read from untrusted bytes.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::CorruptParams("tree has no nodes".to_string()));
        }
        let len = self.nodes.len();
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value, .. } if !value.is_finite() => {
                    return Err(ModelError::CorruptParams(format!(
                        "leaf {id} has non-finite value"
                    )));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let child_ok = |c: usize| c > id && c < len;
                    if !child_ok(*left) || !child_ok(*right) || left == right {
                        return Err(ModelError::CorruptParams(format!(
                            "node {id} has invalid children ({left}, {right})"
                        )));
                    }
                    if *feature >= self.n_features || threshold.is_nan() {
                        return Err(ModelError::CorruptParams(format!(
                            "node {id} splits on invalid feature {feature}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
