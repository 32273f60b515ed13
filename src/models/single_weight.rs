//! One input neuron, one output neuron, one weight: `y = w * x`.

use crate::error::ModelError;
use crate::models::sdk::Model;
use crate::parameter::{ParameterSet, ParameterSpec};

#[derive(Clone, Debug)]
pub struct SingleWeightModel {
    input: f64,
    target: f64,
    weight: ParameterSpec,
    error_scale: f64,
}

impl SingleWeightModel {
    pub fn new(input: f64, target: f64, weight: ParameterSpec, error_scale: f64) -> Result<Self, ModelError> {
        weight.validate()?;
        Ok(Self { input, target, weight, error_scale })
    }

    pub fn input(&self) -> f64 {
        self.input
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Output activation under the current weight.
    pub fn output(&self, params: &ParameterSet) -> f64 {
        params.value(&self.weight.id) * self.input
    }
}

impl Model for SingleWeightModel {
    fn family(&self) -> &'static str {
        "single-weight"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![self.weight.clone()]
    }

    fn mean_squared_error(&self, params: &ParameterSet) -> f64 {
        let err = self.output(params) - self.target;
        err * err
    }

    fn error_scale(&self) -> f64 {
        self.error_scale
    }
}
