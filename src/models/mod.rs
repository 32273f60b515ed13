pub mod sdk;
pub mod polynomial;
pub mod propagation;
pub mod single_weight;

pub use sdk::{Model, ShrinkRule};
pub use polynomial::PolynomialModel;
pub use propagation::{NodeId, PropagationModel, Topology, TopologyBuilder};
pub use single_weight::SingleWeightModel;
