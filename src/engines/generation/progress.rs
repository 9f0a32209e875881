use super::evolution_engine::ProgressCallback;

/// Reports progress through the `log` facade.
pub struct ConsoleProgressCallback {
    report_every: usize,
}

impl ConsoleProgressCallback {
    pub fn new(report_every: usize) -> Self {
        Self {
            report_every: report_every.max(1),
        }
    }
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64, hof_size: usize) {
        if (generation + 1) % self.report_every == 0 {
            log::info!(
                "Generation {} complete. Best fitness: {:.4}, Hall of Fame size: {}",
                generation + 1,
                best_fitness,
                hof_size
            );
        }
    }
}

/// Discards every notification.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64, _hof_size: usize) {}
}
