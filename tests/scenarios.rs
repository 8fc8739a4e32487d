use approx::assert_relative_eq;
use stepwise::{Error, Kinetic, Particle, PotentialDispatcher, StepLadder, Vector3};

fn particle(index: usize, position: [f64; 3], velocity: [f64; 3], mass: f64) -> Particle {
    Particle::new(index, Vector3::from(position), Vector3::from(velocity), mass).unwrap()
}

/// Run events between two particles, checking energy and momentum after each one
fn run_events(dispatcher: &PotentialDispatcher, a: &mut Particle, b: &mut Particle, events: usize) {
    let mut state = dispatcher.get_state(a, b).unwrap();
    let ladder = dispatcher.ladder_for(a.index(), b.index()).clone();
    let total_energy = a.kinetic_energy() + b.kinetic_energy() + ladder.state_energy(state);
    let momentum = a.momentum() + b.momentum();

    for _ in 0..events {
        let prediction = dispatcher
            .predict(a, b, state, 0.0)
            .unwrap()
            .expect("a confined pair always has a next event");
        assert!(prediction.time >= 0.0);

        // nothing happens before the predicted crossing
        let (mut half_a, mut half_b) = (a.clone(), b.clone());
        half_a.advance(0.5 * prediction.time);
        half_b.advance(0.5 * prediction.time);
        assert_eq!(dispatcher.get_state(&half_a, &half_b).unwrap(), state);

        a.advance(prediction.time);
        b.advance(prediction.time);
        let outcome = dispatcher.bump_crossing(a, b, state, prediction.crossing, 0.0);
        state = outcome.new_state;

        let energy = a.kinetic_energy() + b.kinetic_energy() + ladder.state_energy(state);
        assert_relative_eq!(energy, total_energy, epsilon = 1e-8);
        assert_relative_eq!(a.momentum() + b.momentum(), momentum, epsilon = 1e-8);
    }
}

#[test]
fn hard_spheres_head_on() {
    let dispatcher = PotentialDispatcher::new(
        StepLadder::hard_sphere(1.0).unwrap(),
        StepLadder::tether(1.0, 2.0).unwrap(),
    );
    let mut a = particle(0, [0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
    let mut b = particle(1, [2.0, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
    let state = dispatcher.get_state(&a, &b).unwrap();
    assert_eq!(state, 1);
    let time = dispatcher.collision_time(&a, &b, state, 0.0).unwrap();
    assert_relative_eq!(time, 1.0, epsilon = 1e-12);
    a.advance(time);
    b.advance(time);
    let outcome = dispatcher.bump(&mut a, &mut b, state, 0.0);
    assert_eq!(outcome.new_state, 1);
    assert_eq!(outcome.energy_change, 0.0);
    assert_relative_eq!(a.velocity, Vector3::new(-0.5, 0.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(b.velocity, Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
    // flying apart, never to meet again
    assert!(dispatcher
        .collision_time(&a, &b, outcome.new_state, 0.0)
        .unwrap()
        .is_infinite());
}

#[test]
fn square_well_capture_and_escape() {
    let dispatcher = PotentialDispatcher::new(
        StepLadder::square_well(1.0, 1.5, 1.0).unwrap(),
        StepLadder::tether(1.0, 2.0).unwrap(),
    );
    // captured from outside, gaining kinetic energy
    let mut a = particle(0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
    let mut b = particle(1, [3.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 1.0);
    let state = dispatcher.get_state(&a, &b).unwrap();
    assert_eq!(state, 2);
    let time = dispatcher.collision_time(&a, &b, state, 0.0).unwrap();
    assert_relative_eq!(time, 1.5, epsilon = 1e-12);
    a.advance(time);
    b.advance(time);
    let before = a.kinetic_energy() + b.kinetic_energy();
    let outcome = dispatcher.bump(&mut a, &mut b, state, 0.0);
    assert_eq!(outcome.new_state, 1);
    assert_eq!(outcome.energy_change, -1.0);
    assert_relative_eq!(a.kinetic_energy() + b.kinetic_energy(), before + 1.0, epsilon = 1e-12);

    // slowly separating inside the well: reflected at the edge
    let mut a = particle(0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0);
    let mut b = particle(1, [1.5, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
    let outcome = dispatcher.bump(&mut a, &mut b, 1, 0.0);
    assert_eq!(outcome.new_state, 1);
    assert_relative_eq!((b.velocity - a.velocity).x, -0.5, epsilon = 1e-12);
}

#[test]
fn overlap_is_reported_or_repaired() {
    let mut dispatcher = PotentialDispatcher::new(
        StepLadder::hard_sphere(1.0).unwrap(),
        StepLadder::tether(1.0, 2.0).unwrap(),
    );
    let mut a = particle(0, [0.0, 0.0, 0.0], [0.5, 0.0, 0.0], 1.0);
    let mut b = particle(1, [0.9, 0.0, 0.0], [-0.5, 0.0, 0.0], 1.0);
    assert!(matches!(
        dispatcher.get_state(&a, &b),
        Err(Error::Overlap { .. })
    ));

    dispatcher.nonbonded_mut().set_fix_overlap(true);
    let state = dispatcher.get_state(&a, &b).unwrap();
    assert_eq!(state, 0);
    let prediction = dispatcher.predict(&a, &b, state, 0.0).unwrap().unwrap();
    assert!(prediction.time > 0.0 && prediction.time < 1e-2);
    a.advance(prediction.time);
    b.advance(prediction.time);
    dispatcher.bump_crossing(&mut a, &mut b, state, prediction.crossing, 0.0);
    // pushed apart; the pair now leaves the core at no energy cost
    assert!((b.velocity - a.velocity).x > 0.0);
    let prediction = dispatcher.predict(&a, &b, state, 0.0).unwrap().unwrap();
    a.advance(prediction.time);
    b.advance(prediction.time);
    let outcome = dispatcher.bump_crossing(&mut a, &mut b, state, prediction.crossing, 0.0);
    assert_eq!(outcome.new_state, 1);
    assert_eq!(outcome.energy_change, 0.0);
}

#[test]
fn bonded_pair_in_well_conserves_energy() {
    let ladder =
        StepLadder::new(&[1.0, 1.5, 2.0], &[f64::INFINITY, -1.0, 0.0, f64::INFINITY]).unwrap();
    let mut dispatcher = PotentialDispatcher::new(
        StepLadder::hard_sphere(1.0).unwrap(),
        StepLadder::tether(1.0, 2.0).unwrap(),
    );
    dispatcher.add_bond_with(0, 1, ladder).unwrap();
    let mut a = particle(0, [0.0, 0.0, 0.0], [0.3, -0.2, 0.1], 1.0);
    let mut b = particle(1, [1.8, 0.0, 0.0], [-0.4, 0.9, 0.25], 2.0);
    run_events(&dispatcher, &mut a, &mut b, 300);
}

#[test]
fn multi_well_pair_conserves_energy() {
    // stepped attraction inside an impenetrable tether at 2
    let ladder = StepLadder::new(
        &[1.0, 1.2, 1.4, 1.6, 2.0],
        &[f64::INFINITY, -2.0, -1.0, -0.5, 0.0, f64::INFINITY],
    )
    .unwrap();
    let mut dispatcher = PotentialDispatcher::new(StepLadder::hard_sphere(1.0).unwrap(), ladder);
    dispatcher.add_bond(3, 8).unwrap();
    let mut a = particle(3, [1.0, 1.0, 1.0], [1.2, 0.0, -0.3], 3.0);
    let mut b = particle(8, [1.0, 2.3, 1.0], [0.0, 0.4, 0.8], 0.5);
    run_events(&dispatcher, &mut a, &mut b, 500);
}
