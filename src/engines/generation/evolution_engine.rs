use crate::config::EvolutionConfig;
use crate::engines::generation::{
    hall_of_fame::{EliteGenome, HallOfFame},
    runner::{GenomeOperators, GeneticRunner},
};
use crate::error::{Result, TopogenError};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionSettings {
    pub population_size: usize,
    pub generations: usize,
    pub target_fitness: Option<f64>,
    pub hall_of_fame_size: usize,
    pub seed: Option<u64>,
}

impl From<&EvolutionConfig> for EvolutionSettings {
    fn from(config: &EvolutionConfig) -> Self {
        Self {
            population_size: config.population_size,
            generations: config.generations,
            target_fitness: config.target_fitness,
            hall_of_fame_size: config.hall_of_fame_size,
            seed: config.seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome<G> {
    pub population: Vec<G>,
    pub champion: G,
    pub champion_fitness: f64,
    pub generations_run: usize,
    pub target_reached: bool,
    pub hall_of_fame: Vec<EliteGenome<G>>,
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hall_of_fame_size: usize);
}

/// Repeats [`GeneticRunner::advance`] until the generation budget is spent
/// or the best survivor reaches the target fitness.
pub struct EvolutionEngine<G, O> {
    settings: EvolutionSettings,
    runner: GeneticRunner<G, O>,
    hall_of_fame: HallOfFame<G>,
    rng: Xoshiro256PlusPlus,
}

impl<G, O> EvolutionEngine<G, O>
where
    G: Clone + Serialize,
    O: GenomeOperators<G>,
{
    pub fn new(settings: EvolutionSettings, runner: GeneticRunner<G, O>) -> Result<Self> {
        if settings.population_size < runner.selection_pool_size() {
            return Err(TopogenError::Size {
                required: runner.selection_pool_size(),
                actual: settings.population_size,
            });
        }

        let rng = match settings.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };
        let hall_of_fame = HallOfFame::new(settings.hall_of_fame_size);

        Ok(Self {
            settings,
            runner,
            hall_of_fame,
            rng,
        })
    }

    pub fn from_config(config: &EvolutionConfig, operators: O) -> Result<Self> {
        let runner = GeneticRunner::new(operators, config.mutate_portion, config.selection_pool_size)?;
        Self::new(EvolutionSettings::from(config), runner)
    }

    pub fn settings(&self) -> &EvolutionSettings {
        &self.settings
    }

    pub fn runner(&self) -> &GeneticRunner<G, O> {
        &self.runner
    }

    pub fn hall_of_fame(&self) -> &HallOfFame<G> {
        &self.hall_of_fame
    }

    /// The engine's generator, for building the initial population from the
    /// same seeded stream.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }

    pub fn run<C: ProgressCallback>(
        &mut self,
        initial: Vec<G>,
        callback: &mut C,
    ) -> Result<EvolutionOutcome<G>> {
        let mut population = initial;
        let mut generations_run = 0;
        let mut target_reached = false;

        for generation in 0..self.settings.generations {
            callback.on_generation_start(generation);

            let step = self
                .runner
                .advance(&population, self.settings.population_size, &mut self.rng)?;

            for (genome, &fitness) in step.population.iter().zip(&step.survivor_fitness) {
                self.hall_of_fame.try_add(genome, fitness, generation)?;
            }

            let best_fitness = step.survivor_fitness[0];
            callback.on_generation_complete(generation, best_fitness, self.hall_of_fame.len());

            population = step.population;
            generations_run = generation + 1;

            if self.target_reached(best_fitness) {
                log::info!(
                    "Target fitness reached in generation {}: {:.4}",
                    generation + 1,
                    best_fitness
                );
                target_reached = true;
                break;
            }
        }

        // Offspring of the last step have not been scored yet
        let ranked = self.runner.rank(&population);
        let (champion_index, champion_fitness) = *ranked.first().ok_or(TopogenError::Size {
            required: self.runner.selection_pool_size(),
            actual: 0,
        })?;
        self.hall_of_fame
            .try_add(&population[champion_index], champion_fitness, generations_run)?;
        target_reached |= self.target_reached(champion_fitness);

        Ok(EvolutionOutcome {
            champion: population[champion_index].clone(),
            champion_fitness,
            population,
            generations_run,
            target_reached,
            hall_of_fame: self.hall_of_fame.get_all().to_vec(),
        })
    }

    fn target_reached(&self, fitness: f64) -> bool {
        self.settings
            .target_fitness
            .is_some_and(|target| fitness >= target)
    }
}
