// demos/curve_fit.rs
// Run with:
//   cargo run --example curve_fit
//
// Plays the curve-fitting sequence without a screen: every challenge is
// handed to the solver in turn, and the chain opens the next one on success.

use fitting_puzzles::puzzles::curve_fit;
use fitting_puzzles::{Challenge, DescentSchedule, Observer};
use tracing::{info, Level};

struct Log;

impl Observer for Log {
    fn on_activated(&mut self, c: &Challenge) {
        info!(challenge = c.id(), error = c.last_error(), "now playable");
    }
    fn on_solved(&mut self, c: &Challenge) {
        let values: Vec<String> = c.parameters().iter().map(|p| format!("{}={}", p.id(), p.label())).collect();
        info!(challenge = c.id(), error = c.last_error(), values = %values.join(" "), "solved");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut chain = curve_fit::curve_fit_chain()?;
    chain.observe(Box::new(Log));

    // The demo is not interactive, so skip the pauses meant for redraws.
    let schedule = DescentSchedule::new(200_000, 100, 0);
    while let Some(id) = chain.frontier().map(|c| c.id().to_string()) {
        let out = chain.gradient_descent(&id, schedule)?;
        info!(
            challenge = %out.challenge,
            iterations = out.iterations,
            error = out.error,
            step = out.descent.step_size,
            "run finished"
        );
        if !out.solved {
            info!(challenge = %id, "budget exhausted; stopping here");
            break;
        }
    }

    for c in chain.iter() {
        println!("{:<11} {:?}  error={:.3e}", c.id(), c.status(), c.compute_error());
    }
    Ok(())
}
