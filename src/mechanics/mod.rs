pub mod control;
pub mod residual;
pub mod sampling;
pub mod stoch;

pub use control::*;
pub use residual::*;
pub use sampling::*;
pub use stoch::*;
