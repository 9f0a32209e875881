//! Evolves a byte string towards a goal word with the generic engine.

use rand::{Rng, RngCore};
use topogen::engines::generation::{
    choose, EvolutionEngine, EvolutionSettings, FnOperators, GeneticRunner, ProgressCallback,
};

const GOAL: &[u8] = b"topogen";

struct BestTracker {
    best: Vec<f64>,
}

impl ProgressCallback for BestTracker {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, best_fitness: f64, _hof_size: usize) {
        self.best.push(best_fitness);
    }
}

/// Matching bytes score 1, mismatches lose a quarter of their distance
/// (rounded up), and every byte of length difference costs 1.
fn fitness(candidate: &Vec<u8>) -> f64 {
    let mut score: i64 = 0;
    for (g, c) in GOAL.iter().zip(candidate) {
        if g == c {
            score += 1;
        } else {
            score -= (((*g as i64) - (*c as i64)).abs() + 3) / 4;
        }
    }
    (score - (GOAL.len() as i64 - candidate.len() as i64).abs()) as f64
}

fn mutate(candidate: &Vec<u8>, rng: &mut dyn RngCore) -> Vec<u8> {
    let mut bytes = candidate.clone();
    let count = rng.gen_range(0..8);

    for _ in 0..count {
        match choose(&[0.3, 0.5, 0.2], rng).unwrap() {
            0 => {
                let (i, j) = (rng.gen_range(0..bytes.len()), rng.gen_range(0..bytes.len()));
                bytes.swap(i, j);
            }
            1 => {
                let i = rng.gen_range(0..bytes.len());
                let step = rng.gen_range(1..=4u8);
                bytes[i] = if rng.gen::<bool>() {
                    bytes[i].wrapping_add(step)
                } else {
                    bytes[i].wrapping_sub(step)
                };
            }
            _ => {
                if rng.gen::<bool>() {
                    bytes.push(rng.gen_range(b'a'..=b'z'));
                } else if bytes.len() > 1 {
                    bytes.pop();
                }
            }
        }
    }

    bytes
}

fn cross(first: &Vec<u8>, second: &Vec<u8>, rng: &mut dyn RngCore) -> Vec<u8> {
    let (short, long) = if first.len() <= second.len() {
        (first, second)
    } else {
        (second, first)
    };
    let len = rng.gen_range(short.len()..=long.len());

    (0..len)
        .map(|i| match (first.get(i), second.get(i)) {
            (Some(a), Some(b)) => {
                if rng.gen::<bool>() {
                    *a
                } else {
                    *b
                }
            }
            (Some(a), None) => *a,
            (None, Some(b)) => *b,
            (None, None) => unreachable!("index beyond both parents"),
        })
        .collect()
}

fn random_word(rng: &mut dyn RngCore) -> Vec<u8> {
    let len = rng.gen_range(0..20) + rng.gen_range(0..6) + 2;
    (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect()
}

#[test]
fn test_string_population_improves() {
    let operators = FnOperators::new(fitness, mutate, cross);
    let runner = GeneticRunner::<Vec<u8>, _>::new(operators, 0.8, 4).unwrap();
    let settings = EvolutionSettings {
        population_size: 40,
        generations: 400,
        target_fitness: Some(GOAL.len() as f64),
        hall_of_fame_size: 5,
        seed: Some(2017),
    };
    let mut engine = EvolutionEngine::new(settings, runner).unwrap();

    let initial: Vec<Vec<u8>> = (0..40).map(|_| random_word(engine.rng())).collect();
    let initial_best = initial.iter().map(fitness).fold(f64::MIN, f64::max);

    let mut tracker = BestTracker { best: Vec::new() };
    let outcome = engine.run(initial, &mut tracker).unwrap();

    assert!(tracker.best.windows(2).all(|w| w[1] >= w[0]));
    assert!(outcome.champion_fitness > initial_best);
    assert_eq!(outcome.champion_fitness, fitness(&outcome.champion));
    if outcome.target_reached {
        assert_eq!(outcome.champion, GOAL.to_vec());
    }

    let hof_fitness: Vec<f64> = outcome.hall_of_fame.iter().map(|e| e.fitness).collect();
    assert!(hof_fitness.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_crossover_length_between_parents() {
    let mut rng = rand::thread_rng();
    let a = b"abc".to_vec();
    let b = b"vwxyz".to_vec();

    for _ in 0..100 {
        let child = cross(&a, &b, &mut rng);
        assert!((3..=5).contains(&child.len()));
        assert!(child[3..].iter().all(|c| *c == b'y' || *c == b'z'));
    }
}
