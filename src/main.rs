use anyhow::Context;
use topogen::config::ConfigManager;
use topogen::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use topogen::engines::neural::{random_population, NetworkOperators, NeuralNetwork};

const XOR_CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// 4 minus the squared error over the XOR truth table; 4 is a perfect score.
fn xor_fitness(network: &NeuralNetwork) -> f64 {
    let error: f64 = XOR_CASES
        .iter()
        .map(|(inputs, expected)| match network.feed_forward(inputs) {
            Ok(outputs) => (outputs[0] - expected).powi(2),
            Err(_) => 1.0,
        })
        .sum();
    4.0 - error
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1);
    let manager = ConfigManager::new();
    manager
        .load_layered(config_path.as_deref())
        .context("loading configuration")?;
    let config = manager.get();

    if config.network.layer_sizes.first() != Some(&2) || config.network.layer_sizes.last() != Some(&1) {
        anyhow::bail!(
            "XOR needs 2 inputs and 1 output, network.layer_sizes is {:?}",
            config.network.layer_sizes
        );
    }

    let operators = NetworkOperators::from_config(xor_fitness, &config.mutation)?;
    let mut engine: EvolutionEngine<NeuralNetwork, _> = EvolutionEngine::from_config(&config.evolution, operators)?;
    let initial = random_population(
        &config.network.layer_sizes,
        config.evolution.population_size,
        engine.rng(),
    )?;

    log::info!(
        "Evolving {} networks of shape {:?} for up to {} generations",
        config.evolution.population_size,
        config.network.layer_sizes,
        config.evolution.generations
    );

    let mut progress = ConsoleProgressCallback::new(25);
    let outcome = engine.run(initial, &mut progress)?;

    log::info!(
        "Finished after {} generations, champion fitness {:.4}",
        outcome.generations_run,
        outcome.champion_fitness
    );

    for (rank, elite) in engine.hall_of_fame().get_top_n(3).iter().enumerate() {
        log::info!(
            "Hall of fame #{}: fitness {:.4}, shape {:?}, found in generation {}",
            rank + 1,
            elite.fitness,
            elite.genome.shape(),
            elite.generation
        );
    }

    println!("{}", outcome.champion.snapshot().to_json_pretty()?);
    for (inputs, expected) in XOR_CASES {
        let output = outcome.champion.feed_forward(&inputs)?;
        println!(
            "{} XOR {} = {:.4} (expected {})",
            inputs[0], inputs[1], output[0], expected
        );
    }

    Ok(())
}
