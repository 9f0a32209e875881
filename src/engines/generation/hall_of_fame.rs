use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct EliteGenome<G> {
    pub genome: G,
    pub fitness: f64,
    /// Generation in which the genome was first recorded.
    pub generation: usize,
    pub canonical_string: String, // For deduplication
}

/// Best distinct genomes seen over a run, best first.
pub struct HallOfFame<G> {
    entries: Vec<EliteGenome<G>>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl<G: Serialize + Clone> HallOfFame<G> {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Record a genome unless an identical one is already present.
    ///
    /// Returns whether the genome was inserted; it may be trimmed straight
    /// away if the hall is full of fitter genomes.
    pub fn try_add(&mut self, genome: &G, fitness: f64, generation: usize) -> Result<bool> {
        let canonical_string = canonical_string(genome)?;
        if self.seen_signatures.contains(&canonical_string) {
            return Ok(false);
        }

        self.seen_signatures.insert(canonical_string.clone());
        self.entries.push(EliteGenome {
            genome: genome.clone(),
            fitness,
            generation,
            canonical_string,
        });
        self.sort_and_trim();

        Ok(true)
    }

    fn sort_and_trim(&mut self) {
        // Stable: earlier entries win ties
        self.entries.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_signatures.remove(&removed.canonical_string);
            }
        }
    }

    pub fn get_all(&self) -> &[EliteGenome<G>] {
        &self.entries
    }

    pub fn get_top_n(&self, n: usize) -> &[EliteGenome<G>] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn best(&self) -> Option<&EliteGenome<G>> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical JSON form used to detect duplicate genomes.
pub fn canonical_string<G: Serialize>(genome: &G) -> Result<String> {
    Ok(serde_json::to_string(genome)?)
}
