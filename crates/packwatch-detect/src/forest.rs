//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
//! Isolation forest over standardized telemetry features.
//!
//! Anomalies are isolated by random axis-aligned splits: rows that separate
//! from the bulk in few splits get short paths and scores near 1.0, dense
//! rows get long paths and scores near 0.0. Every tree draws its own rng
//! seeded from the forest seed plus the tree index, so a fixed seed gives
//! identical forests on identical input.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::standardize::FEATURE_COUNT;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Split attempts before a partition gives up and terminates in a leaf.
const SPLIT_ATTEMPTS: usize = 8;

/// Tuning knobs for forest construction.
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    pub num_trees: usize,
    pub sample_size: usize,
    pub max_depth: usize,
    pub seed: u64,
}

#[derive(Debug)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// Single isolation tree built over a subsample of the feature matrix.
#[derive(Debug)]
pub struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn fit(rows: &[[f64; FEATURE_COUNT]], max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: build_node(rows, 0, max_depth, rng),
        }
    }

    /// Depth at which a row lands, with the standard average-path adjustment
    /// for leaves that still hold multiple samples.
    pub fn path_length(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + c_factor(*size),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] < *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn build_node(
    rows: &[[f64; FEATURE_COUNT]],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= max_depth || rows.len() <= 1 || all_same(rows) {
        return Node::Leaf { size: rows.len() };
    }
    let Some((feature, threshold)) = select_split(rows, rng) else {
        return Node::Leaf { size: rows.len() };
    };
    let (left, right): (Vec<_>, Vec<_>) = rows
        .iter()
        .copied()
        .partition(|row| row[feature] < threshold);
    if left.is_empty() || right.is_empty() {
        return Node::Leaf { size: rows.len() };
    }
    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(&left, depth + 1, max_depth, rng)),
        right: Box::new(build_node(&right, depth + 1, max_depth, rng)),
    }
}

fn all_same(rows: &[[f64; FEATURE_COUNT]]) -> bool {
    rows.windows(2).all(|pair| pair[0] == pair[1])
}

fn select_split(rows: &[[f64; FEATURE_COUNT]], rng: &mut StdRng) -> Option<(usize, f64)> {
    for _ in 0..SPLIT_ATTEMPTS {
        let feature = rng.gen_range(0..FEATURE_COUNT);
        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;
        for row in rows {
            min_val = min_val.min(row[feature]);
            max_val = max_val.max(row[feature]);
        }
        if max_val - min_val <= f64::EPSILON {
            continue;
        }
        return Some((feature, rng.gen_range(min_val..max_val)));
    }
    None
}

/// Ensemble of isolation trees plus the normalization constant for the
/// per-tree subsample size.
#[derive(Debug)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    expected_path: f64,
}

impl IsolationForest {
    /// Fit the forest over the full feature matrix. Each tree trains on its
    /// own subsample drawn without replacement.
    pub fn fit(config: &ForestConfig, rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let sample_size = config.sample_size.min(rows.len());
        let mut trees = Vec::with_capacity(config.num_trees);
        for tree_index in 0..config.num_trees {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_index as u64));
            let subset = subsample(rows, sample_size, &mut rng);
            trees.push(IsolationTree::fit(&subset, config.max_depth, &mut rng));
        }
        Self {
            trees,
            expected_path: c_factor(sample_size),
        }
    }

    /// Anomaly score in (0, 1): `2^(-E[path] / c(sample_size))`.
    pub fn score(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        if self.trees.is_empty() || self.expected_path <= 0.0 {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|tree| tree.path_length(row)).sum();
        let average = total / self.trees.len() as f64;
        2f64.powf(-average / self.expected_path)
    }

    /// Score every row of a matrix, index-aligned.
    pub fn score_all(&self, rows: &[[f64; FEATURE_COUNT]]) -> Vec<f64> {
        rows.iter().map(|row| self.score(row)).collect()
    }
}

fn subsample(
    rows: &[[f64; FEATURE_COUNT]],
    sample_size: usize,
    rng: &mut StdRng,
) -> Vec<[f64; FEATURE_COUNT]> {
    if sample_size >= rows.len() {
        return rows.to_vec();
    }
    rand::seq::index::sample(rng, rows.len(), sample_size)
        .into_iter()
        .map(|index| rows[index])
        .collect()
}

/// Average unsuccessful-search path length of a binary search tree over `n`
/// samples; the normalization term from the isolation forest formulation.
pub fn c_factor(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}
