//! JSON tree-ensemble classifier artifacts.
//!
//! Two kinds share one envelope. A `vote` ensemble (the default when `kind`
//! is absent) holds trees whose leaves name a class:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["net_ev", "volatility", "efficiency", "capital_required", "user_bankroll"],
//!   "classes": ["AVOID", "STRATEGIC_BUY"],
//!   "trees": [
//!     { "nodes": [
//!         { "split": { "feature": 0, "threshold": 0.0, "left": 1, "right": 2 } },
//!         { "leaf": { "class": 0 } },
//!         { "leaf": { "class": 1 } }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Every tree votes; the most voted class wins and ties go to the lowest
//! class index.
//!
//! A `gradient_boosting` ensemble is an exported gradient-boosted classifier:
//! per-class `init` raw scores, a `learning_rate`, and `stages`, each stage
//! holding one regression tree per class with `{"leaf": {"value": ..}}`
//! leaves. The raw score of class `k` is `init[k] + learning_rate * sum of
//! stage tree k outputs`, and the highest raw score wins. Two-class models
//! carry one tree per stage and one `init` value; the second class wins when
//! the raw score is positive.
//!
//! In both kinds splits send `x[feature] <= threshold` left.

use std::path::Path;

use common::{Recommendation, FEATURE_COUNT, FEATURE_ORDER};
use serde::Deserialize;

use crate::model::{Classifier, ModelLoadError, PredictionError};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Deserialize)]
struct ClassLeaf {
    class: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ValueLeaf {
    value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Node<L> {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(L),
}

#[derive(Debug, Clone, Deserialize)]
struct Tree<L> {
    nodes: Vec<Node<L>>,
}

impl<L: Copy> Tree<L> {
    fn leaf(&self, features: &[f64; FEATURE_COUNT]) -> L {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(leaf) => return leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Structure checks shared by both kinds; `check_leaf` covers the payload.
    fn validate(
        &self,
        label: &str,
        check_leaf: impl Fn(&L) -> Result<(), String>,
    ) -> Result<(), ModelLoadError> {
        if self.nodes.is_empty() {
            return Err(ModelLoadError::Invalid(format!("{} has no nodes", label)));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(ModelLoadError::Invalid(format!(
                            "{} node {}: feature index {} out of range",
                            label, i, feature
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelLoadError::Invalid(format!(
                            "{} node {}: threshold is NaN",
                            label, i
                        )));
                    }
                    // Children strictly after the parent: traversal always terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelLoadError::Invalid(format!(
                                "{} node {}: child index {} invalid",
                                label, i, child
                            )));
                        }
                    }
                }
                Node::Leaf(leaf) => check_leaf(leaf).map_err(|reason| {
                    ModelLoadError::Invalid(format!("{} node {}: {}", label, i, reason))
                })?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ArtifactKind {
    #[default]
    Vote,
    GradientBoosting,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    format_version: u32,
    #[serde(default)]
    kind: ArtifactKind,
    feature_names: Vec<String>,
    classes: Vec<String>,
    #[serde(default)]
    trees: Vec<Tree<ClassLeaf>>,
    #[serde(default)]
    init: Vec<f64>,
    #[serde(default)]
    learning_rate: Option<f64>,
    #[serde(default)]
    stages: Vec<Vec<Tree<ValueLeaf>>>,
}

#[derive(Debug, Clone)]
enum Ensemble {
    Vote(Vec<Tree<ClassLeaf>>),
    Boosted {
        init: Vec<f64>,
        learning_rate: f64,
        stages: Vec<Vec<Tree<ValueLeaf>>>,
    },
}

/// Validated, ready-to-predict ensemble.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    classes: Vec<Recommendation>,
    ensemble: Ensemble,
}

impl TreeEnsemble {
    pub fn from_path(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let artifact: Artifact = serde_json::from_str(raw)?;
        Self::validate(artifact)
    }

    pub fn tree_count(&self) -> usize {
        match &self.ensemble {
            Ensemble::Vote(trees) => trees.len(),
            Ensemble::Boosted { stages, .. } => stages.iter().map(Vec::len).sum(),
        }
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn validate(artifact: Artifact) -> Result<Self, ModelLoadError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelLoadError::Invalid(format!(
                "unsupported format_version {} (expected {})",
                artifact.format_version, FORMAT_VERSION
            )));
        }

        if artifact.feature_names.len() != FEATURE_COUNT
            || artifact
                .feature_names
                .iter()
                .zip(FEATURE_ORDER.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ModelLoadError::Invalid(format!(
                "feature order {:?} does not match {:?}",
                artifact.feature_names, FEATURE_ORDER
            )));
        }

        if artifact.classes.is_empty() {
            return Err(ModelLoadError::Invalid("no classes".into()));
        }
        let classes = artifact
            .classes
            .iter()
            .map(|c| c.parse::<Recommendation>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ModelLoadError::Invalid(e.to_string()))?;

        let ensemble = match artifact.kind {
            ArtifactKind::Vote => {
                if artifact.trees.is_empty() {
                    return Err(ModelLoadError::Invalid("no trees".into()));
                }
                for (t, tree) in artifact.trees.iter().enumerate() {
                    tree.validate(&format!("tree {}", t), |leaf| {
                        if leaf.class >= classes.len() {
                            Err(format!("class index {} out of range", leaf.class))
                        } else {
                            Ok(())
                        }
                    })?;
                }
                Ensemble::Vote(artifact.trees)
            }
            ArtifactKind::GradientBoosting => {
                let width = boosted_width(classes.len())?;
                if artifact.init.len() != width || artifact.init.iter().any(|v| !v.is_finite()) {
                    return Err(ModelLoadError::Invalid(format!(
                        "init must hold {} finite values, got {:?}",
                        width, artifact.init
                    )));
                }
                let learning_rate = match artifact.learning_rate {
                    Some(lr) if lr.is_finite() && lr > 0.0 => lr,
                    other => {
                        return Err(ModelLoadError::Invalid(format!(
                            "learning_rate must be a finite number > 0, got {:?}",
                            other
                        )))
                    }
                };
                if artifact.stages.is_empty() {
                    return Err(ModelLoadError::Invalid("no stages".into()));
                }
                for (s, stage) in artifact.stages.iter().enumerate() {
                    if stage.len() != width {
                        return Err(ModelLoadError::Invalid(format!(
                            "stage {} has {} trees, expected {}",
                            s,
                            stage.len(),
                            width
                        )));
                    }
                    for (k, tree) in stage.iter().enumerate() {
                        tree.validate(&format!("stage {} tree {}", s, k), |leaf| {
                            if leaf.value.is_finite() {
                                Ok(())
                            } else {
                                Err(format!("leaf value {} is not finite", leaf.value))
                            }
                        })?;
                    }
                }
                Ensemble::Boosted {
                    init: artifact.init,
                    learning_rate,
                    stages: artifact.stages,
                }
            }
        };

        Ok(Self { classes, ensemble })
    }
}

/// Trees per boosting stage: one for two classes, else one per class.
fn boosted_width(class_count: usize) -> Result<usize, ModelLoadError> {
    match class_count {
        0 | 1 => Err(ModelLoadError::Invalid(
            "gradient_boosting needs at least two classes".into(),
        )),
        2 => Ok(1),
        n => Ok(n),
    }
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

impl Classifier for TreeEnsemble {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<Recommendation, PredictionError> {
        for (name, value) in FEATURE_ORDER.iter().zip(features.iter()) {
            if !value.is_finite() {
                return Err(PredictionError::NonFiniteFeature {
                    name: *name,
                    value: *value,
                });
            }
        }

        let winner = match &self.ensemble {
            Ensemble::Vote(trees) => {
                let mut votes = vec![0usize; self.classes.len()];
                for tree in trees {
                    votes[tree.leaf(features).class] += 1;
                }
                // max_by_key keeps the last maximum; scan in reverse so ties favor the lowest index.
                votes
                    .iter()
                    .enumerate()
                    .rev()
                    .max_by_key(|(_, count)| **count)
                    .map(|(idx, _)| idx)
                    .unwrap_or(0)
            }
            Ensemble::Boosted {
                init,
                learning_rate,
                stages,
            } => {
                let mut raw = init.clone();
                for stage in stages {
                    for (score, tree) in raw.iter_mut().zip(stage) {
                        *score += learning_rate * tree.leaf(features).value;
                    }
                }
                if raw.len() == 1 {
                    usize::from(raw[0] > 0.0)
                } else {
                    argmax(&raw)
                }
            }
        };
        Ok(self.classes[winner])
    }
}
