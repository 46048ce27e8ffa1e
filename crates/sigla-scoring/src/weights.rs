//! Weighting vectors over a dimension schema.
//!
//! A `WeightVector` is validated on construction and again whenever it is used
//! to rank; every derived vector (ablation, resampling, rescaling) is
//! renormalized to sum to 1.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use sigla_core::constants::WEIGHT_SUM_TOLERANCE;
use sigla_core::errors::InvalidWeightingError;
use sigla_core::types::collections::FxHashSet;

use crate::dimension::DimensionSchema;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    dimensions: Vec<String>,
    weights: Vec<f64>,
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.dimensions.len()))?;
        for (d, w) in self.iter() {
            map.serialize_entry(d, &w)?;
        }
        map.end()
    }
}

impl WeightVector {
    /// Weights for the listed dimensions; unlisted schema dimensions get 0.
    pub fn new(schema: &DimensionSchema, pairs: &[(&str, f64)]) -> Result<Self, InvalidWeightingError> {
        if pairs.is_empty() || schema.is_empty() {
            return Err(InvalidWeightingError::Empty);
        }
        let mut seen = FxHashSet::default();
        let mut weights = vec![0.0; schema.len()];
        for &(dimension, weight) in pairs {
            let idx = schema
                .index_of(dimension)
                .ok_or_else(|| InvalidWeightingError::UnknownDimension {
                    dimension: dimension.to_string(),
                })?;
            if !seen.insert(dimension) {
                return Err(InvalidWeightingError::Duplicate {
                    dimension: dimension.to_string(),
                });
            }
            weights[idx] = weight;
        }
        let vector = Self {
            dimensions: schema.ids().map(str::to_string).collect(),
            weights,
        };
        vector.validate()?;
        Ok(vector)
    }

    pub fn from_map(
        schema: &DimensionSchema,
        map: &BTreeMap<String, f64>,
    ) -> Result<Self, InvalidWeightingError> {
        let pairs: Vec<(&str, f64)> = map.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        Self::new(schema, &pairs)
    }

    /// Equal weight on every schema dimension.
    pub fn uniform(schema: &DimensionSchema) -> Result<Self, InvalidWeightingError> {
        if schema.is_empty() {
            return Err(InvalidWeightingError::Empty);
        }
        let w = 1.0 / schema.len() as f64;
        Ok(Self {
            dimensions: schema.ids().map(str::to_string).collect(),
            weights: vec![w; schema.len()],
        })
    }

    /// Finite, non-negative, summing to 1 within tolerance.
    pub fn validate(&self) -> Result<(), InvalidWeightingError> {
        if self.weights.is_empty() {
            return Err(InvalidWeightingError::Empty);
        }
        for (d, &w) in self.dimensions.iter().zip(&self.weights) {
            if !w.is_finite() {
                return Err(InvalidWeightingError::NonFinite { dimension: d.clone() });
            }
            if w < 0.0 {
                return Err(InvalidWeightingError::Negative {
                    dimension: d.clone(),
                    weight: w,
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InvalidWeightingError::NotNormalized { sum });
        }
        Ok(())
    }

    /// Drop one dimension and renormalize the rest.
    pub fn without(&self, dimension: &str) -> Result<Self, InvalidWeightingError> {
        let idx = self.index_of(dimension).ok_or_else(|| InvalidWeightingError::UnknownDimension {
            dimension: dimension.to_string(),
        })?;
        let mut multipliers = vec![1.0; self.len()];
        multipliers[idx] = 0.0;
        self.reweighted(&multipliers).map_err(|e| match e {
            InvalidWeightingError::NothingLeft { .. } => InvalidWeightingError::NothingLeft {
                removed: vec![dimension.to_string()],
            },
            other => other,
        })
    }

    /// Multiply the listed dimensions by `factor` and renormalize.
    pub fn scaled(&self, dimensions: &[&str], factor: f64) -> Result<Self, InvalidWeightingError> {
        let mut multipliers = vec![1.0; self.len()];
        for d in dimensions {
            let idx = self.index_of(d).ok_or_else(|| InvalidWeightingError::UnknownDimension {
                dimension: d.to_string(),
            })?;
            multipliers[idx] = factor;
        }
        self.reweighted(&multipliers)
    }

    /// Elementwise `weight × multiplier`, renormalized. Multipliers follow schema order.
    pub fn reweighted(&self, multipliers: &[f64]) -> Result<Self, InvalidWeightingError> {
        if multipliers.len() != self.len() {
            return Err(InvalidWeightingError::LengthMismatch {
                found: multipliers.len(),
                expected: self.len(),
            });
        }
        let raw: Vec<f64> = self
            .weights
            .iter()
            .zip(multipliers)
            .map(|(w, m)| w * m)
            .collect();
        for (d, &w) in self.dimensions.iter().zip(&raw) {
            if !w.is_finite() {
                return Err(InvalidWeightingError::NonFinite { dimension: d.clone() });
            }
            if w < 0.0 {
                return Err(InvalidWeightingError::Negative {
                    dimension: d.clone(),
                    weight: w,
                });
            }
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(InvalidWeightingError::NothingLeft {
                removed: self
                    .dimensions
                    .iter()
                    .zip(&raw)
                    .filter(|(_, &w)| w == 0.0)
                    .map(|(d, _)| d.clone())
                    .collect(),
            });
        }
        Ok(Self {
            dimensions: self.dimensions.clone(),
            weights: raw.into_iter().map(|w| w / total).collect(),
        })
    }

    pub fn get(&self, dimension: &str) -> Option<f64> {
        self.index_of(dimension).map(|i| self.weights[i])
    }

    fn index_of(&self, dimension: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == dimension)
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn values(&self) -> &[f64] {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.dimensions
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(d, w)| (d.to_string(), w)).collect()
    }
}
