use crate::error::{Error, Result};
use crate::features::FeatureVector;

use super::artifact::Aggregation;
use super::PredictiveModel;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// A single regression tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk from the root to a leaf. A sample goes left when
    /// `x[feature] <= threshold`.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf(value)) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features.get(*feature).ok_or_else(|| {
                        Error::model_unavailable(format!("tree references feature {feature}"))
                    })?;
                    index = if x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(Error::model_unavailable(format!(
                        "tree node {index} does not exist"
                    )))
                }
            }
        }
    }
}

/// Ensemble of regression trees (random forest or gradient boosting).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    aggregation: Aggregation,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub(crate) fn new(
        aggregation: Aggregation,
        base_score: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    ) -> Self {
        Self {
            aggregation,
            base_score,
            learning_rate,
            trees,
        }
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

impl PredictiveModel for TreeEnsemble {
    fn estimate(&self, features: &FeatureVector) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(Error::model_unavailable("tree ensemble has no trees"));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }

        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total * self.learning_rate,
        };
        Ok(self.base_score + combined)
    }

    fn kind(&self) -> &'static str {
        "tree_ensemble"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Split on Sector1Time at 31.0, then on Compound.
    fn stump() -> RegressionTree {
        RegressionTree::new(vec![
            Node::Split {
                feature: 2,
                threshold: 31.0,
                left: 1,
                right: 2,
            },
            Node::Leaf(88.0),
            Node::Split {
                feature: 5,
                threshold: 0.5,
                left: 3,
                right: 4,
            },
            Node::Leaf(90.0),
            Node::Leaf(91.0),
        ])
    }

    fn vector(sector1: f64, compound: f64) -> FeatureVector {
        FeatureVector::new([5.0, 10.0, sector1, 42.1, 25.8, compound])
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let tree = stump();
        assert_eq!(tree.evaluate(&vector(31.0, 0.0)).unwrap(), 88.0);
        assert_eq!(tree.evaluate(&vector(31.4, 0.0)).unwrap(), 90.0);
        assert_eq!(tree.evaluate(&vector(31.4, 1.0)).unwrap(), 91.0);
    }

    #[test]
    fn mean_aggregation_averages_trees() {
        let other = RegressionTree::new(vec![Node::Leaf(92.0)]);
        let ensemble = TreeEnsemble::new(Aggregation::Mean, 0.0, 1.0, vec![stump(), other]);
        assert_eq!(ensemble.estimate(&vector(31.4, 0.0)).unwrap(), 91.0);
    }

    #[test]
    fn sum_aggregation_scales_by_learning_rate() {
        let trees = vec![
            RegressionTree::new(vec![Node::Leaf(2.0)]),
            RegressionTree::new(vec![Node::Leaf(4.0)]),
        ];
        let ensemble = TreeEnsemble::new(Aggregation::Sum, 80.0, 0.5, trees);
        assert_eq!(ensemble.estimate(&vector(31.4, 0.0)).unwrap(), 83.0);
    }

    #[test]
    fn dangling_node_is_reported() {
        let tree = RegressionTree::new(vec![Node::Split {
            feature: 0,
            threshold: 1.0,
            left: 4,
            right: 5,
        }]);
        let err = tree.evaluate(&vector(31.4, 0.0)).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { .. }));
    }
}
