//! Cross-module laws checked against randomized occurrence scripts and a
//! composite pipeline exercising every layer at once.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratchet::Occurrence::{Absent, Occurred};
use ratchet::{Automaton, Occurrence};

fn events() -> Automaton<Occurrence<i32>, Occurrence<i32>> {
    Automaton::stateless(|occurrence| occurrence)
}

fn random_script(seed: u64, len: usize) -> Vec<Occurrence<i32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.3) {
                Occurred(rng.gen_range(-100..100))
            } else {
                Absent
            }
        })
        .collect()
}

fn payloads(outputs: &[Occurrence<i32>]) -> Vec<i32> {
    outputs.iter().filter_map(|o| o.into_option()).collect()
}

#[test]
fn take_emits_prefix_of_occurrence_sequence() {
    for seed in 0..8 {
        let script = random_script(seed, 100);
        let reference = payloads(&script);

        for n in [0usize, 1, 3, 10, 200] {
            let outputs = events().take(n).run(script.clone()).unwrap();
            let taken = payloads(&outputs);
            assert!(taken.len() <= n);
            let expected: Vec<i32> = reference.iter().copied().take(n).collect();
            assert_eq!(taken, expected, "seed {seed}, n {n}");
        }
    }
}

#[test]
fn skip_then_take_slices_occurrence_sequence() {
    for seed in 0..8 {
        let script = random_script(seed, 100);
        let reference = payloads(&script);

        for (n, k) in [(0usize, 5usize), (2, 3), (5, 50), (30, 2)] {
            let outputs = events().skip(n).take(k).run(script.clone()).unwrap();
            let sliced = payloads(&outputs);
            let expected: Vec<i32> = reference.iter().copied().skip(n).take(k).collect();
            assert_eq!(sliced, expected, "seed {seed}, n {n}, k {k}");
        }
    }
}

#[test]
fn hold_matches_latest_occurrence_model() {
    for seed in 0..8 {
        let script = random_script(seed, 100);
        let outputs = events().hold(0).run(script.clone()).unwrap();

        let mut expected = 0;
        for (step, occurrence) in script.into_iter().enumerate() {
            if let Occurred(value) = occurrence {
                expected = value;
            }
            assert_eq!(outputs[step], expected, "seed {seed}, step {step}");
        }
    }
}

#[test]
fn composite_pipeline_across_layers() {
    // Sensor readings come in as plain samples. Spikes are readings above
    // the threshold; the pipeline counts them and renders a status line,
    // exercising only_when, fold_stream and pipe together.
    let readings = Automaton::stateless(|x: i32| x);
    let spikes = readings.only_when(|x: &i32| *x > 50);
    let spike_count = spikes.fold_stream(0usize, |count, _| count + 1);
    let report = spike_count.pipe(Automaton::stateless(|count: usize| {
        format!("spikes: {count}")
    }));

    let outputs = report.run([10, 60, 20, 80, 90, 30]).unwrap();
    assert_eq!(
        outputs,
        vec![
            "spikes: 0",
            "spikes: 1",
            "spikes: 1",
            "spikes: 2",
            "spikes: 3",
            "spikes: 3"
        ]
    );
}

#[test]
fn windows_compose_with_switches() {
    // A stream that is gated off before its third occurrence, then handed
    // over to a constant successor, end to end through run().
    let script = vec![
        Occurred(1),
        Absent,
        Occurred(2),
        Occurred(3),
        Absent,
        Occurred(4),
    ];
    let chained = events().take(2).and_then(Automaton::constant(0));
    let outputs = chained.run(script).unwrap();
    // First absent step of take(2) arrives at index 1, switching there.
    assert_eq!(outputs, vec![1, 0, 0, 0, 0, 0]);
}
