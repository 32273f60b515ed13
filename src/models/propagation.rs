//! Multi-layer propagation over explicit weighted edges.
//!
//! Input nodes carry fixed activations. Every other node takes
//! `clamp(0, 100, sum(weight * source))` over its incoming edges, evaluated
//! layer by layer. Output nodes are compared against target activations.
//!
//! Edges name their weight by parameter id, and several edges may share one
//! id: the three-copies puzzle runs one 2-2-2 network on three input pairs
//! with a single set of eight weights.

use std::collections::HashSet;

use crate::error::ModelError;
use crate::mechanics::{clamp_activation, mean_squared};
use crate::models::sdk::Model;
use crate::parameter::{ParameterSet, ParameterSpec};

pub type NodeId = usize;

#[derive(Clone, Debug)]
struct Node {
    layer: usize,
    input: Option<f64>,
}

#[derive(Clone, Debug)]
struct Edge {
    from: NodeId,
    to: NodeId,
    weight: String,
}

#[derive(Clone, Debug, Default)]
pub struct TopologyBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    targets: Vec<(NodeId, f64)>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input node (layer 0) with a fixed activation.
    pub fn input(&mut self, activation: f64) -> NodeId {
        self.nodes.push(Node { layer: 0, input: Some(activation) });
        self.nodes.len() - 1
    }

    /// Computed node on `layer` (>= 1; `build` rejects layer 0).
    pub fn node(&mut self, layer: usize) -> NodeId {
        self.nodes.push(Node { layer, input: None });
        self.nodes.len() - 1
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId, weight: impl Into<String>) -> &mut Self {
        self.edges.push(Edge { from, to, weight: weight.into() });
        self
    }

    /// Desired activation of `node`.
    pub fn target(&mut self, node: NodeId, activation: f64) -> &mut Self {
        self.targets.push((node, activation));
        self
    }

    pub fn build(self) -> Result<Topology, ModelError> {
        let n = self.nodes.len();
        if let Some(i) = self.nodes.iter().position(|node| node.layer == 0 && node.input.is_none()) {
            return Err(ModelError::ComputedInputLayer(i));
        }
        let mut incoming = vec![Vec::new(); n];
        for (i, e) in self.edges.iter().enumerate() {
            for id in [e.from, e.to] {
                if id >= n {
                    return Err(ModelError::UnknownNode(id));
                }
            }
            if self.nodes[e.to].input.is_some() {
                return Err(ModelError::EdgeIntoInput(e.to));
            }
            if self.nodes[e.from].layer >= self.nodes[e.to].layer {
                return Err(ModelError::BackwardEdge { from: e.from, to: e.to });
            }
            incoming[e.to].push(i);
        }
        if self.targets.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        if let Some(&(id, _)) = self.targets.iter().find(|(id, _)| *id >= n) {
            return Err(ModelError::UnknownNode(id));
        }

        let mut order: Vec<NodeId> = (0..n).filter(|&i| self.nodes[i].input.is_none()).collect();
        order.sort_by_key(|&i| self.nodes[i].layer);

        Ok(Topology {
            nodes: self.nodes,
            edges: self.edges,
            targets: self.targets,
            incoming,
            order,
        })
    }
}

/// Validated layered network.
#[derive(Clone, Debug)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    targets: Vec<(NodeId, f64)>,
    incoming: Vec<Vec<usize>>,
    order: Vec<NodeId>,
}

impl Topology {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn layer(&self, node: NodeId) -> Option<usize> {
        self.nodes.get(node).map(|n| n.layer)
    }

    /// `(from, to, weight id)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &str)> {
        self.edges.iter().map(|e| (e.from, e.to, e.weight.as_str()))
    }

    /// `(output node, target activation)` pairs.
    pub fn targets(&self) -> &[(NodeId, f64)] {
        &self.targets
    }

    fn weight_ids(&self) -> HashSet<&str> {
        self.edges.iter().map(|e| e.weight.as_str()).collect()
    }

    /// Activation of every node under `params`.
    pub fn propagate(&self, params: &ParameterSet) -> Vec<f64> {
        let mut act: Vec<f64> = self.nodes.iter().map(|n| n.input.unwrap_or(0.0)).collect();
        for &id in &self.order {
            let sum: f64 = self.incoming[id]
                .iter()
                .map(|&e| {
                    let edge = &self.edges[e];
                    params.value(&edge.weight) * act[edge.from]
                })
                .sum();
            act[id] = clamp_activation(sum);
        }
        act
    }
}

#[derive(Clone, Debug)]
pub struct PropagationModel {
    topology: Topology,
    weights: Vec<ParameterSpec>,
    error_scale: f64,
}

impl PropagationModel {
    /// Every weight id used by an edge must be declared in `weights`.
    pub fn new(topology: Topology, weights: Vec<ParameterSpec>, error_scale: f64) -> Result<Self, ModelError> {
        let declared: HashSet<&str> = weights.iter().map(|w| w.id.as_str()).collect();
        if let Some(e) = topology.edges.iter().find(|e| !declared.contains(e.weight.as_str())) {
            return Err(ModelError::UndeclaredWeight {
                from: e.from,
                to: e.to,
                weight: e.weight.clone(),
            });
        }
        let used = topology.weight_ids();
        for w in weights.iter().filter(|w| !used.contains(w.id.as_str())) {
            tracing::warn!(weight = %w.id, "declared weight is not used by any edge");
        }
        Ok(Self { topology, weights, error_scale })
    }

    /// Same weight bounds for every id: `[min, max]`, starting at `default`.
    pub fn uniform_weights<'a, I>(ids: I, min: f64, max: f64, default: f64) -> Vec<ParameterSpec>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().map(|id| ParameterSpec::new(id, min, max, default)).collect()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn activations(&self, params: &ParameterSet) -> Vec<f64> {
        self.topology.propagate(params)
    }
}

impl Model for PropagationModel {
    fn family(&self) -> &'static str {
        "propagation"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        self.weights.clone()
    }

    fn mean_squared_error(&self, params: &ParameterSet) -> f64 {
        let act = self.topology.propagate(params);
        mean_squared(self.topology.targets.iter().map(|&(id, target)| act[id] - target))
    }

    fn error_scale(&self) -> f64 {
        self.error_scale
    }
}
