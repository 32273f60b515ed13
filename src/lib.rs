/*!
`fitting_puzzles` — an engine for parameter-fitting puzzles.

What it does
- Holds bounded, named scalar parameters and lets a player (or a solver)
  move them.
- Scores them against a fixed dataset through a `Model`: polynomial curve
  fits of degree 0..=4, a single weight `y = w·x`, and layered propagation
  networks with activations clamped to `[0, 100]`.
- Wraps each model in a `Challenge` with a success threshold and a
  solved/locked state machine, and links challenges into a forward-only
  `ChallengeChain`: solving one opens the next.
- Ships a sign-only finite-difference coordinate hill climb
  (`Optimizer`) and a cooperative `Scheduler` that runs it in batches so
  the host can redraw between them.

How to use (call surface only)
- Build a model, wrap it: `Challenge::new(id, model, threshold)?`.
- `ChallengeChain::register` each challenge in order, then `activate` the
  first (or `activate_all`).
- Drive it from the host: `set_parameter`, `update`, `unlock`,
  `gradient_descent_one_iteration`, `auto_solve`. Read the error, values,
  labels and flags back from `chain.challenge(id)?`, or register an
  `Observer`.
- Or start from a ready-made sequence in `puzzles` (feature-gated).

What it does NOT do
- No rendering, no input handling, no persistence, no training server. The
  host owns the screen and the clock; the engine only owns numbers.
*/

pub mod error;
pub mod mechanics;
pub mod parameter;
pub mod models;
pub mod optimizer;
pub mod challenge;
pub mod chain;
pub mod clock;
pub mod config;
pub mod scheduler;
pub mod puzzles;

pub use error::{ChallengeError, ModelError};
#[cfg(feature = "serde")]
pub use error::ConfigError;

pub use chain::{ChallengeChain, Observer};
pub use challenge::{Challenge, Status, Validation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use models::{Model, PolynomialModel, PropagationModel, ShrinkRule, SingleWeightModel, TopologyBuilder};
pub use optimizer::{DescentConfig, DescentState, IterationReport, Optimizer};
pub use parameter::{Parameter, ParameterSet, ParameterSpec};
pub use scheduler::{DescentSchedule, DescentTask, Progress, Scheduler, SolveOutcome};
