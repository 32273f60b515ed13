// src/parameter.rs

//! Bounded scalar parameters, the unit of user and solver control.
//!
//! Bounds and defaults are fixed at construction. Writes are *not* clamped:
//! the solver steps past a bound when the error keeps pointing that way, and
//! a host slider is expected to enforce its own range.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ModelError;
use crate::mechanics::stoch;

/// Declaration of one parameter, as a model hands it out.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterSpec {
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParameterSpec {
    pub fn new(id: impl Into<String>, min: f64, max: f64, default: f64) -> Self {
        Self { id: id.into(), min, max, default }
    }

    /// Checks `min <= default <= max`.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.min <= self.max) {
            return Err(ModelError::InvertedBounds {
                id: self.id.clone(),
                min: self.min,
                max: self.max,
            });
        }
        if !(self.min..=self.max).contains(&self.default) {
            return Err(ModelError::DefaultOutOfBounds {
                id: self.id.clone(),
                min: self.min,
                max: self.max,
                default: self.default,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    spec: ParameterSpec,
    value: f64,
}

impl Parameter {
    /// Starts at the default. Call [`ParameterSpec::validate`] first.
    pub fn new(spec: ParameterSpec) -> Self {
        let value = spec.default;
        Self { spec, value }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }
    pub fn min(&self) -> f64 {
        self.spec.min
    }
    pub fn max(&self) -> f64 {
        self.spec.max
    }
    pub fn default(&self) -> f64 {
        self.spec.default
    }
    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Overwrites the value. No bounds enforcement.
    #[inline]
    pub fn set_value(&mut self, x: f64) {
        self.value = x;
    }

    pub fn reset(&mut self) {
        self.value = self.spec.default;
    }

    pub fn in_bounds(&self) -> bool {
        (self.spec.min..=self.spec.max).contains(&self.value)
    }

    /// Position inside the bounds, 0 at `min` and 1 at `max` (not clamped).
    pub fn normalized(&self) -> f64 {
        let span = self.spec.max - self.spec.min;
        if span == 0.0 { 0.5 } else { (self.value - self.spec.min) / span }
    }

    /// Value label shown next to a slider.
    pub fn label(&self) -> String {
        format!("{:.3}", self.value)
    }
}

/// A challenge's parameters, keyed and ordered by id.
#[derive(Clone, Debug, Default)]
pub struct ParameterSet {
    params: BTreeMap<String, Parameter>,
}

impl ParameterSet {
    /// Validates every spec and rejects duplicate ids and empty sets.
    pub fn from_specs<I>(specs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = ParameterSpec>,
    {
        let mut params = BTreeMap::new();
        for spec in specs {
            spec.validate()?;
            if params.contains_key(&spec.id) {
                return Err(ModelError::DuplicateParameter(spec.id));
            }
            params.insert(spec.id.clone(), Parameter::new(spec));
        }
        if params.is_empty() {
            return Err(ModelError::NoParameters);
        }
        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.params.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Parameter> {
        self.params.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Parameter> {
        self.params.get_mut(id)
    }

    /// Current value of `id`.
    ///
    /// # Panics
    /// If `id` is not declared. Models only read ids they declared, so this is
    /// a broken model, not a runtime condition.
    #[inline]
    pub fn value(&self, id: &str) -> f64 {
        match self.params.get(id) {
            Some(p) => p.value,
            None => panic!("model read undeclared parameter `{id}`"),
        }
    }

    pub fn try_value(&self, id: &str) -> Option<f64> {
        self.params.get(id).map(Parameter::value)
    }

    /// Overwrites `id`; returns false when it does not exist.
    pub fn set_value(&mut self, id: &str, x: f64) -> bool {
        match self.params.get_mut(id) {
            Some(p) => {
                p.set_value(x);
                true
            }
            None => false,
        }
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    /// Sweep order of the solver: reverse lexicographic, so the last layer's
    /// weights (or the highest coefficient) are visited first.
    pub fn descent_order(&self) -> Vec<String> {
        self.params.keys().rev().cloned().collect()
    }

    pub fn reset_all(&mut self) {
        for p in self.params.values_mut() {
            p.reset();
        }
    }

    /// Uniform random values inside each parameter's bounds.
    pub fn scramble(&mut self, seed: u64) {
        let mut rng = stoch::seeded(seed);
        for p in self.params.values_mut() {
            let x = stoch::uniform_in(&mut rng, p.min(), p.max());
            trace!(parameter = p.id(), value = x, "scrambled");
            p.set_value(x);
        }
    }

    /// `(id, value)` pairs in ascending id order.
    pub fn snapshot(&self) -> Vec<(String, f64)> {
        self.params.iter().map(|(k, p)| (k.clone(), p.value)).collect()
    }
}
