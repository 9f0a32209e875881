use crate::error::{Result, TopogenError};
use rand::{Rng, RngCore};

/// Capability set a genome type must provide to be evolved.
///
/// Higher fitness is considered more fit. Mutation and crossover build new
/// genome values and never touch their parents.
pub trait GenomeOperators<G> {
    fn fitness(&self, genome: &G) -> f64;
    fn mutate(&self, genome: &G, rng: &mut dyn RngCore) -> Result<G>;
    fn crossover(&self, first: &G, second: &G, rng: &mut dyn RngCore) -> Result<G>;
}

/// Operator set assembled from three closures.
pub struct FnOperators<F, M, C> {
    pub fitness: F,
    pub mutate: M,
    pub crossover: C,
}

impl<F, M, C> FnOperators<F, M, C> {
    pub fn new(fitness: F, mutate: M, crossover: C) -> Self {
        Self {
            fitness,
            mutate,
            crossover,
        }
    }
}

impl<G, F, M, C> GenomeOperators<G> for FnOperators<F, M, C>
where
    F: Fn(&G) -> f64,
    M: Fn(&G, &mut dyn RngCore) -> G,
    C: Fn(&G, &G, &mut dyn RngCore) -> G,
{
    fn fitness(&self, genome: &G) -> f64 {
        (self.fitness)(genome)
    }

    fn mutate(&self, genome: &G, rng: &mut dyn RngCore) -> Result<G> {
        Ok((self.mutate)(genome, rng))
    }

    fn crossover(&self, first: &G, second: &G, rng: &mut dyn RngCore) -> Result<G> {
        Ok((self.crossover)(first, second, rng))
    }
}

/// Result of one generation step, with the fitness of every survivor in
/// slot order.
#[derive(Debug, Clone)]
pub struct StepOutcome<G> {
    pub population: Vec<G>,
    pub survivor_fitness: Vec<f64>,
}

impl<G> StepOutcome<G> {
    pub fn best_fitness(&self) -> Option<f64> {
        self.survivor_fitness.first().copied()
    }
}

pub struct GeneticRunner<G, O> {
    operators: O,
    /// Chance that an offspring slot is filled by mutation rather than
    /// crossover. Values outside [0, 1] behave as if clamped.
    mutate_portion: f64,
    selection_pool_size: usize,
    _genome: std::marker::PhantomData<fn() -> G>,
}

impl<G, O> GeneticRunner<G, O>
where
    G: Clone,
    O: GenomeOperators<G>,
{
    pub fn new(operators: O, mutate_portion: f64, selection_pool_size: usize) -> Result<Self> {
        if selection_pool_size == 0 {
            return Err(TopogenError::Configuration(
                "Selection pool size must be positive".to_string(),
            ));
        }

        Ok(Self {
            operators,
            mutate_portion,
            selection_pool_size,
            _genome: std::marker::PhantomData,
        })
    }

    pub fn operators(&self) -> &O {
        &self.operators
    }

    pub fn selection_pool_size(&self) -> usize {
        self.selection_pool_size
    }

    pub fn mutate_portion(&self) -> f64 {
        self.mutate_portion
    }

    /// Fitness of every genome paired with its index, best first.
    ///
    /// The sort is stable: equal fitness keeps the original relative order.
    /// A NaN score, whatever its sign bit, is ranked as negative infinity.
    pub fn rank(&self, population: &[G]) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = population
            .iter()
            .enumerate()
            .map(|(index, genome)| {
                let fitness = self.operators.fitness(genome);
                (index, if fitness.is_nan() { f64::NEG_INFINITY } else { fitness })
            })
            .collect();

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Produce the next population of exactly `new_size` genomes.
    ///
    /// The first `selection_pool_size` slots hold the survivors ordered best
    /// to worst; the rest are offspring of uniformly drawn survivors.
    pub fn step(&self, population: &[G], new_size: usize, rng: &mut dyn RngCore) -> Result<Vec<G>> {
        Ok(self.advance(population, new_size, rng)?.population)
    }

    pub fn advance(
        &self,
        population: &[G],
        new_size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<StepOutcome<G>> {
        if population.len() < self.selection_pool_size {
            return Err(TopogenError::Size {
                required: self.selection_pool_size,
                actual: population.len(),
            });
        }
        if new_size < self.selection_pool_size {
            return Err(TopogenError::Size {
                required: self.selection_pool_size,
                actual: new_size,
            });
        }

        let ranked = self.rank(population);
        let survivors = &ranked[..self.selection_pool_size];

        let mut next_population = Vec::with_capacity(new_size);
        next_population.extend(survivors.iter().map(|&(index, _)| population[index].clone()));
        let survivor_fitness: Vec<f64> = survivors.iter().map(|&(_, fitness)| fitness).collect();

        let mut mutated = 0usize;
        let mut crossed = 0usize;
        for _ in self.selection_pool_size..new_size {
            let first = rng.gen_range(0..self.selection_pool_size);
            let child = if rng.gen::<f64>() < self.mutate_portion {
                mutated += 1;
                self.operators.mutate(&next_population[first], rng)?
            } else {
                let second = rng.gen_range(0..self.selection_pool_size);
                crossed += 1;
                self.operators
                    .crossover(&next_population[first], &next_population[second], rng)?
            };
            next_population.push(child);
        }

        log::debug!(
            "Step: {} -> {} genomes, best fitness {:.4}, {} mutated, {} crossed",
            population.len(),
            new_size,
            survivor_fitness[0],
            mutated,
            crossed
        );

        Ok(StepOutcome {
            population: next_population,
            survivor_fitness,
        })
    }
}
