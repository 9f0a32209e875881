use crate::error::{Result, TopogenError};
use rand::distributions::Distribution;
use rand::Rng;

/// Index sampler with probability proportional to a set of positive weights.
///
/// Weights are validated once in [`WeightedChoice::new`], after which the
/// sampler can be drawn from any number of times through the
/// [`Distribution`] impl.
#[derive(Debug, Clone)]
pub struct WeightedChoice {
    weights: Vec<f64>,
    total: f64,
}

impl WeightedChoice {
    pub fn new(weights: &[f64]) -> Result<Self> {
        let total = validate(weights)?;
        Ok(Self {
            weights: weights.to_vec(),
            total,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

impl Distribution<usize> for WeightedChoice {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        pick(&self.weights, self.total, rng)
    }
}

/// Draw an index from `weights` in one shot.
pub fn choose<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize> {
    let total = validate(weights)?;
    Ok(pick(weights, total, rng))
}

fn validate(weights: &[f64]) -> Result<f64> {
    if weights.is_empty() {
        return Err(TopogenError::Validation(
            "Weighted choice needs at least one weight".to_string(),
        ));
    }

    let mut total = 0.0;
    for &weight in weights {
        // Written this way so NaN is rejected too
        if !(weight > 0.0) || !weight.is_finite() {
            return Err(TopogenError::Validation(format!(
                "Weight must be positive and finite: {}",
                weight
            )));
        }
        total += weight;
    }

    Ok(total)
}

fn pick<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    let spin = rng.gen::<f64>() * total;

    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative > spin {
            return index;
        }
    }

    // Fallback for rounding at the top of the range
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rejects_empty_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            choose(&[], &mut rng),
            Err(TopogenError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_weights() {
        assert!(WeightedChoice::new(&[1.0, 0.0]).is_err());
        assert!(WeightedChoice::new(&[1.0, -2.0]).is_err());
        assert!(WeightedChoice::new(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_single_weight_always_chosen() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(choose(&[0.25], &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_frequency_tracks_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let choice = WeightedChoice::new(&[1.0, 3.0]).unwrap();

        let draws = 100_000;
        let ones = (0..draws).filter(|_| choice.sample(&mut rng) == 1).count();
        let share = ones as f64 / draws as f64;

        // Expected 0.75, standard deviation is about 0.0014
        assert!((share - 0.75).abs() < 0.01, "share was {}", share);
    }

    #[test]
    fn test_index_always_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = [600.0, 200.0, 50.0, 100.0, 20.0];
        for _ in 0..10_000 {
            assert!(choose(&weights, &mut rng).unwrap() < weights.len());
        }
    }
}
