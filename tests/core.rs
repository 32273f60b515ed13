// tests/core.rs
use fitting_puzzles::{
    Challenge, ChallengeChain, ChallengeError, EngineConfig, ManualClock, ModelError, Observer, ParameterSet,
    ParameterSpec, PolynomialModel, SingleWeightModel, Status,
};
use std::cell::RefCell;
use std::rc::Rc;

/// `y = w * 100` against 77; solved once `w` is within ~0.0077 of 0.77.
fn weight_challenge(id: &str) -> Challenge {
    let model = SingleWeightModel::new(100.0, 77.0, ParameterSpec::new("a", 0.0, 1.0, 0.5), 0.0001686625)
        .expect("valid weight");
    Challenge::new(id, model, 0.0001).expect("valid challenge")
}

fn line_challenge(id: &str) -> Challenge {
    let model = PolynomialModel::sampled(&[2.0, -0.3], -9.0, 9.0, 20, 0.01).expect("valid line");
    Challenge::new(id, model, 0.00004).expect("valid challenge")
}

fn chain_abc() -> ChallengeChain {
    let mut chain = ChallengeChain::new();
    for id in ["A", "B", "C"] {
        chain.register(weight_challenge(id)).expect("unique id");
    }
    chain
}

#[derive(Clone, Default)]
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Observer for Recorder {
    fn on_activated(&mut self, c: &Challenge) {
        self.log.borrow_mut().push(format!("activated {}", c.id()));
    }
    fn on_solved(&mut self, c: &Challenge) {
        self.log.borrow_mut().push(format!("solved {}", c.id()));
    }
    fn on_lock_changed(&mut self, c: &Challenge, locked: bool) {
        let what = if locked { "locked" } else { "unlocked" };
        self.log.borrow_mut().push(format!("{what} {}", c.id()));
    }
}

/* ──────────────────────────────────────────────────────────────────────────
1) Registration wires the successor links in order
────────────────────────────────────────────────────────────────────────── */

#[test]
fn registration_links_each_challenge_to_the_next() {
    let chain = chain_abc();

    assert_eq!(chain.len(), 3);
    assert_eq!(chain.next_of("A").map(Challenge::id), Some("B"));
    assert_eq!(chain.next_of("B").map(Challenge::id), Some("C"));
    assert!(chain.next_of("C").is_none());

    let order: Vec<&str> = chain.iter().map(Challenge::id).collect();
    assert_eq!(order, ["A", "B", "C"]);
    assert!(chain.iter().all(|c| c.status() == Status::Inactive));
}

#[test]
fn duplicate_and_unknown_ids_are_rejected() {
    let mut chain = chain_abc();
    let err = chain.register(weight_challenge("B")).unwrap_err();
    assert_eq!(err, ChallengeError::DuplicateChallenge("B".into()));
    assert_eq!(chain.len(), 3);

    assert!(matches!(chain.activate("Z"), Err(ChallengeError::UnknownChallenge(_))));
    assert!(chain.get("Z").is_none());
}

/* ──────────────────────────────────────────────────────────────────────────
2) Chain monotonicity: a successor is opened exactly once and stays open
────────────────────────────────────────────────────────────────────────── */

#[test]
fn solving_opens_the_successor_exactly_once() {
    let mut chain = chain_abc();
    let rec = Recorder::default();
    let log = Rc::clone(&rec.log);
    chain.observe(Box::new(rec));

    chain.activate("A").unwrap();
    assert_eq!(chain.frontier().map(Challenge::id), Some("A"));

    let v = chain.set_parameter("A", "a", 0.77).unwrap().expect("A is active");
    assert!(v.newly_solved && v.below_threshold);
    assert!(chain.challenge("A").unwrap().is_solved());
    assert!(chain.challenge("B").unwrap().is_active());
    assert!(!chain.challenge("C").unwrap().is_active());

    // Leave the solution and come back: nothing is re-triggered.
    chain.unlock("A").unwrap();
    chain.set_parameter("A", "a", 0.2).unwrap();
    let v = chain.set_parameter("A", "a", 0.77).unwrap().unwrap();
    assert!(!v.newly_solved, "solved is sticky");
    assert!(chain.challenge("A").unwrap().is_solved());
    assert!(chain.challenge("B").unwrap().is_active());

    let activations: Vec<String> = log.borrow().iter().filter(|e| e.starts_with("activated")).cloned().collect();
    assert_eq!(activations, ["activated A", "activated B"]);
    let solves = log.borrow().iter().filter(|e| e.starts_with("solved")).count();
    assert_eq!(solves, 1);
    assert_eq!(chain.frontier().map(Challenge::id), Some("B"));
}

#[test]
fn activate_all_opens_everything_without_solving() {
    let mut chain = chain_abc();
    chain.activate_all();
    assert!(chain.iter().all(|c| c.is_active() && !c.is_solved() && !c.is_locked()));
}

#[test]
fn solving_a_predecessor_keeps_an_open_solved_successor_locked() {
    let mut chain = chain_abc();
    chain.activate_all();
    chain.set_parameter("B", "a", 0.77).unwrap();
    assert!(chain.challenge("B").unwrap().is_locked());

    chain.set_parameter("A", "a", 0.77).unwrap();
    let b = chain.challenge("B").unwrap();
    assert!(b.is_solved() && b.is_locked() && b.unlock_offered());
    assert_eq!(
        chain.set_parameter("B", "a", 0.5).unwrap_err(),
        ChallengeError::Locked("B".into())
    );
}

#[test]
fn a_first_solve_revalidates_the_open_successor() {
    let clock = Rc::new(ManualClock::new(0));
    let mut chain = ChallengeChain::new().with_clock(clock.clone());
    for id in ["A", "B"] {
        chain.register(weight_challenge(id)).unwrap();
    }
    chain.activate_all();
    let rec = Recorder::default();
    let log = Rc::clone(&rec.log);
    chain.observe(Box::new(rec));

    chain.set_parameter("B", "a", 0.77).unwrap();
    chain.unlock("B").unwrap();
    clock.set(6_000);
    assert!(!chain.challenge("B").unwrap().is_locked(), "nothing has validated B since");

    chain.set_parameter("A", "a", 0.77).unwrap();
    assert!(chain.challenge("B").unwrap().is_locked());
    assert_eq!(
        *log.borrow(),
        ["locked B", "solved B", "unlocked B", "locked A", "solved A", "locked B"]
    );
}

#[test]
fn activating_a_solved_challenge_again_keeps_its_lock() {
    let mut chain = chain_abc();
    chain.activate("A").unwrap();
    chain.set_parameter("A", "a", 0.77).unwrap();
    let rec = Recorder::default();
    let log = Rc::clone(&rec.log);
    chain.observe(Box::new(rec));

    chain.activate("A").unwrap();
    chain.activate_all();
    assert!(chain.challenge("A").unwrap().is_locked());
    assert!(chain.challenge("B").unwrap().is_active() && !chain.challenge("B").unwrap().is_locked());
    let a_events: Vec<String> = log.borrow().iter().filter(|e| e.ends_with(" A")).cloned().collect();
    assert!(a_events.is_empty(), "{a_events:?}");
}

/* ──────────────────────────────────────────────────────────────────────────
3) Lock / unlock grace window
────────────────────────────────────────────────────────────────────────── */

#[test]
fn unlock_grace_window_suppresses_relocking_until_it_expires() {
    let clock = Rc::new(ManualClock::new(1_000));
    let mut chain = ChallengeChain::new().with_clock(clock.clone());
    chain.register(weight_challenge("A")).unwrap();
    chain.activate("A").unwrap();

    chain.set_parameter("A", "a", 0.77).unwrap();
    let a = chain.challenge("A").unwrap();
    assert!(a.is_locked() && a.unlock_offered() && a.solved_indicator());
    assert_eq!(
        chain.set_parameter("A", "a", 0.5).unwrap_err(),
        ChallengeError::Locked("A".into())
    );

    chain.unlock("A").unwrap();
    assert!(!chain.challenge("A").unwrap().is_locked());

    clock.advance(4_999);
    let v = chain.set_parameter("A", "a", 0.7701).unwrap().unwrap();
    assert!(v.below_threshold);
    assert!(!v.newly_locked);
    assert!(!chain.challenge("A").unwrap().is_locked(), "still inside the grace window");

    clock.advance(2);
    let v = chain.validate("A").unwrap().unwrap();
    assert!(v.newly_locked);
    assert!(chain.challenge("A").unwrap().is_locked());
}

#[test]
fn grace_length_comes_from_the_engine_config() {
    let clock = Rc::new(ManualClock::new(0));
    let cfg = EngineConfig { unlock_grace_ms: 10, ..EngineConfig::default() };
    let mut chain = ChallengeChain::new().with_clock(clock.clone()).with_config(cfg);
    chain.register(weight_challenge("A")).unwrap();
    chain.activate("A").unwrap();
    chain.set_parameter("A", "a", 0.77).unwrap();
    chain.unlock("A").unwrap();

    clock.set(9);
    chain.validate("A").unwrap();
    assert!(!chain.challenge("A").unwrap().is_locked());
    clock.set(10);
    chain.validate("A").unwrap();
    assert!(chain.challenge("A").unwrap().is_locked());
}

#[test]
fn interactive_writes_need_an_active_unlocked_challenge() {
    let mut chain = chain_abc();
    assert_eq!(
        chain.set_parameter("B", "a", 0.1).unwrap_err(),
        ChallengeError::Inactive("B".into())
    );
    chain.activate("B").unwrap();
    assert!(matches!(
        chain.set_parameter("B", "zz", 0.1),
        Err(ChallengeError::UnknownParameter { .. })
    ));
    chain.set_parameter("B", "a", 0.1).unwrap();
    assert_eq!(chain.parameter_value("B", "a").unwrap(), 0.1);

    // Inactive challenges are never validated.
    assert!(chain.update("C").unwrap().is_none());
}

/* ──────────────────────────────────────────────────────────────────────────
4) Error computation and construction checks
────────────────────────────────────────────────────────────────────────── */

#[test]
fn compute_error_is_deterministic_and_non_negative() {
    let mut c = line_challenge("line");
    for seed in 0..20 {
        c.scramble(seed);
        let e1 = c.compute_error();
        let e2 = c.compute_error();
        assert_eq!(e1, e2);
        assert!(e1 >= 0.0, "seed {seed}: error {e1}");
        assert!(c.parameters().iter().all(|p| p.in_bounds()));
    }
    c.reset();
    assert_eq!(c.parameter_value("a0"), Some(0.0));
    assert_eq!(c.parameter_value("a1"), Some(0.0));
}

#[test]
fn scramble_is_reproducible_per_seed() {
    let mut a = line_challenge("a");
    let mut b = line_challenge("b");
    a.scramble(42);
    b.scramble(42);
    assert_eq!(a.parameters().snapshot(), b.parameters().snapshot());
    b.scramble(43);
    assert_ne!(a.parameters().snapshot(), b.parameters().snapshot());
}

#[test]
fn constructors_reject_inconsistent_declarations() {
    let bad_default = ParameterSpec::new("a", 0.0, 1.0, 2.0);
    assert!(matches!(
        SingleWeightModel::new(1.0, 1.0, bad_default, 1.0),
        Err(ModelError::DefaultOutOfBounds { .. })
    ));

    let dup = ParameterSet::from_specs([ParameterSpec::new("a", 0.0, 1.0, 0.0), ParameterSpec::new("a", 0.0, 1.0, 0.0)]);
    assert_eq!(dup.unwrap_err(), ModelError::DuplicateParameter("a".into()));
    assert_eq!(ParameterSet::from_specs(Vec::new()).unwrap_err(), ModelError::NoParameters);

    assert_eq!(
        PolynomialModel::new(5, vec![(0.0, 0.0)], 1.0).unwrap_err(),
        ModelError::UnsupportedDegree(5)
    );
    assert_eq!(PolynomialModel::new(1, vec![], 1.0).unwrap_err(), ModelError::EmptyDataset);

    let model = PolynomialModel::new(0, vec![(0.0, 1.0)], 1.0).unwrap();
    assert_eq!(
        Challenge::new("x", model, 0.0).unwrap_err(),
        ChallengeError::InvalidThreshold(0.0)
    );

    // A zero error at the defaults must not hide a bad scale.
    for scale in [-1.0, 0.0, f64::NAN] {
        let model = PolynomialModel::new(0, vec![(0.0, 0.0)], scale).unwrap();
        assert!(matches!(
            Challenge::new("x", model, 1.0),
            Err(ChallengeError::Model(ModelError::InvalidErrorScale(_)))
        ));
    }
}

#[test]
fn labels_use_three_decimals() {
    let mut set = ParameterSet::from_specs([ParameterSpec::new("a", -1.0, 1.0, 0.0)]).unwrap();
    set.set_value("a", 0.123456);
    let p = set.get("a").unwrap();
    assert_eq!(p.label(), "0.123");
    assert!((p.normalized() - 0.561728).abs() < 1e-9);
    assert_eq!(set.descent_order(), ["a"]);
}
