// demos/neural.rs
// Run with:
//   cargo run --example neural
//
// Opens the neural sequence at the auto-solve access level and runs every
// challenge side by side on one scheduler.

use fitting_puzzles::puzzles::{neural, Access};
use fitting_puzzles::{DescentSchedule, DescentTask, Scheduler};
use tracing::{info, Level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut chain = neural::neural_chain()?;
    Access::AutoSolve.apply(&mut chain);

    let mut scheduler = Scheduler::new();
    let ids: Vec<String> = chain.iter().map(|c| c.id().to_string()).collect();
    for id in &ids {
        scheduler.spawn(DescentTask::new(id.as_str(), DescentSchedule::new(50_000, 50, 0)));
    }

    let outcomes = scheduler.run(&mut chain, std::thread::sleep)?;
    for out in &outcomes {
        info!(
            challenge = %out.challenge,
            solved = out.solved,
            iterations = out.iterations,
            error = out.error,
            "run finished"
        );
    }

    for c in chain.iter() {
        let weights: Vec<String> = c.parameters().iter().map(|p| format!("{}={}", p.id(), p.label())).collect();
        println!("{:<11} {:?}  error={:.3e}  {}", c.id(), c.status(), c.compute_error(), weights.join(" "));
    }
    Ok(())
}
