//! On-disk JSON format of a trained lap time model.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["LapNumber", "TyreLife", "Sector1Time", "Sector2Time", "Sector3Time", "Compound"],
//!   "model": { "type": "linear", "intercept": 0.5, "coefficients": [0.0, 0.02, 1.0, 1.0, 1.0, 0.3] }
//! }
//! ```
//!
//! Tree ensembles use `"type": "tree_ensemble"` with a list of trees, each a
//! flat node array where node 0 is the root and splits point forward.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

use super::linear::LinearModel;
use super::tree::{Node, RegressionTree, TreeEnsemble};
use super::{LoadedModel, ModelInfo, PredictiveModel};

/// Artifact format version understood by this library.
pub const FORMAT_VERSION: u32 = 1;

/// Reference input used to probe a freshly built model.
const PROBE_VECTOR: [f64; FEATURE_COUNT] = [5.0, 10.0, 31.4, 42.1, 25.8, 0.0];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    TreeEnsemble {
        #[serde(default)]
        aggregation: Aggregation,
        #[serde(default)]
        base_score: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        trees: Vec<TreeSpec>,
    },
}

fn default_learning_rate() -> f64 {
    1.0
}

/// How tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Average of tree outputs (random forest).
    #[default]
    Mean,
    /// Sum of tree outputs scaled by the learning rate (gradient boosting).
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ModelArtifact {
    /// Validate the artifact and build the model it describes.
    pub fn build(self) -> Result<LoadedModel> {
        if self.format_version != FORMAT_VERSION {
            return Err(Error::invalid_artifact(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        check_feature_order(&self.feature_names)?;

        let (model, tree_count): (Arc<dyn PredictiveModel>, Option<usize>) = match self.model {
            ModelSpec::Linear {
                intercept,
                coefficients,
            } => (Arc::new(build_linear(intercept, &coefficients)?), None),
            ModelSpec::TreeEnsemble {
                aggregation,
                base_score,
                learning_rate,
                trees,
            } => {
                let ensemble = build_ensemble(aggregation, base_score, learning_rate, trees)?;
                let count = ensemble.len();
                (Arc::new(ensemble), Some(count))
            }
        };

        let probe = model.estimate(&FeatureVector::new(PROBE_VECTOR))?;
        if !probe.is_finite() {
            return Err(Error::invalid_artifact(
                "probe estimate on the reference lap is not finite",
            ));
        }
        tracing::debug!(probe, kind = model.kind(), "model probe ok");

        Ok(LoadedModel {
            info: ModelInfo {
                kind: model.kind().to_string(),
                feature_names: self.feature_names,
                source: None,
                tree_count,
                loaded_at: chrono::Utc::now().to_rfc3339(),
            },
            model,
        })
    }
}

fn check_feature_order(found: &[String]) -> Result<()> {
    if found.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()) {
        return Ok(());
    }
    Err(Error::FeatureOrderMismatch {
        expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        found: found.to_vec(),
    })
}

fn build_linear(intercept: f64, coefficients: &[f64]) -> Result<LinearModel> {
    let coefficients: [f64; FEATURE_COUNT] = coefficients.try_into().map_err(|_| {
        Error::invalid_artifact(format!(
            "linear model needs {} coefficients, found {}",
            FEATURE_COUNT,
            coefficients.len()
        ))
    })?;

    if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
        return Err(Error::invalid_artifact(
            "linear model parameters must be finite",
        ));
    }

    Ok(LinearModel::new(intercept, coefficients))
}

fn build_ensemble(
    aggregation: Aggregation,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<TreeSpec>,
) -> Result<TreeEnsemble> {
    if trees.is_empty() {
        return Err(Error::invalid_artifact("tree ensemble has no trees"));
    }
    if !base_score.is_finite() || !learning_rate.is_finite() || learning_rate <= 0.0 {
        return Err(Error::invalid_artifact(
            "base_score must be finite and learning_rate positive",
        ));
    }

    let trees = trees
        .into_iter()
        .enumerate()
        .map(|(index, spec)| build_tree(index, spec))
        .collect::<Result<Vec<_>>>()?;

    Ok(TreeEnsemble::new(aggregation, base_score, learning_rate, trees))
}

/// Children must point strictly forward, which rules out cycles and bounds
/// every traversal by the node count.
fn build_tree(index: usize, spec: TreeSpec) -> Result<RegressionTree> {
    let len = spec.nodes.len();
    if len == 0 {
        return Err(Error::invalid_artifact(format!("tree {index} has no nodes")));
    }

    let mut nodes = Vec::with_capacity(len);
    for (position, node) in spec.nodes.into_iter().enumerate() {
        let node = match node {
            TreeNodeSpec::Leaf { value } => {
                if !value.is_finite() {
                    return Err(Error::invalid_artifact(format!(
                        "tree {index} node {position}: leaf value must be finite"
                    )));
                }
                Node::Leaf(value)
            }
            TreeNodeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= FEATURE_COUNT {
                    return Err(Error::invalid_artifact(format!(
                        "tree {index} node {position}: feature {feature} out of range"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(Error::invalid_artifact(format!(
                        "tree {index} node {position}: threshold must be finite"
                    )));
                }
                for child in [left, right] {
                    if child <= position || child >= len {
                        return Err(Error::invalid_artifact(format!(
                            "tree {index} node {position}: child {child} must point forward within {len} nodes"
                        )));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }
            }
        };
        nodes.push(node);
    }

    Ok(RegressionTree::new(nodes))
}
