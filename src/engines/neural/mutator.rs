//! Structural and weight mutations of a [`NeuralNetwork`].
//!
//! Every edit runs on a [`NetworkSnapshot`] working copy. The network handed
//! back by [`TopologyMutator::mutate`] is restored from that copy, so the
//! dimensional invariants are re-checked once per mutation.

use super::network::{gaussian, gaussian_weights, NeuralNetwork};
use super::snapshot::{LayerSnapshot, NetworkSnapshot, NeuronSnapshot};
use crate::config::mutation::{LayerJoinPolicy, MutationConfig};
use crate::config::traits::ConfigSection;
use crate::engines::generation::weighted_choice::WeightedChoice;
use crate::error::{Result, TopogenError};
use rand::distributions::Distribution;
use rand::{Rng, RngCore};
use std::ops::RangeInclusive;

/// Values closer to zero than this are replaced instead of scaled.
const ADJUST_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    AdjustWeight,
    AddNeuron,
    RemoveNeuron,
    AddLayer,
    RemoveLayer,
}

impl MutationKind {
    /// Order matches [`MutationWeights::as_array`](crate::config::mutation::MutationWeights::as_array).
    pub const ALL: [MutationKind; 5] = [
        MutationKind::AdjustWeight,
        MutationKind::AddNeuron,
        MutationKind::RemoveNeuron,
        MutationKind::AddLayer,
        MutationKind::RemoveLayer,
    ];
}

#[derive(Debug, Clone)]
pub struct TopologyMutator {
    max_mutations: usize,
    categories: WeightedChoice,
    adjust_weight_max_percent: f64,
    new_layer_neurons: RangeInclusive<usize>,
    join_policy: LayerJoinPolicy,
}

impl TopologyMutator {
    pub fn new(config: &MutationConfig) -> Result<Self> {
        config.validate()?;

        let categories = WeightedChoice::new(&config.weights.as_array())
            .map_err(|e| TopogenError::Configuration(e.to_string()))?;

        Ok(Self {
            max_mutations: config.max_mutations,
            categories,
            adjust_weight_max_percent: config.adjust_weight_max_percent,
            new_layer_neurons: config.new_layer_min_neurons..=config.new_layer_max_neurons,
            join_policy: config.layer_join_policy,
        })
    }

    pub fn join_policy(&self) -> LayerJoinPolicy {
        self.join_policy
    }

    /// Apply between 0 and `max_mutations - 1` random edits to a copy of
    /// `network`.
    pub fn mutate(&self, network: &NeuralNetwork, rng: &mut dyn RngCore) -> Result<NeuralNetwork> {
        let mut snapshot = network.snapshot();

        let count = rng.gen_range(0..self.max_mutations);
        let mut applied = 0usize;
        for _ in 0..count {
            if self.mutate_once(&mut snapshot, rng)?.is_some() {
                applied += 1;
            }
        }

        log::trace!(
            "Mutated network: {} of {} edits applied, shape now {:?}",
            applied,
            count,
            snapshot.layer_data.iter().map(|l| l.neuron_count).collect::<Vec<_>>()
        );

        NeuralNetwork::try_from(snapshot)
    }

    /// Draw one category and one interior layer and apply the edit.
    ///
    /// Returns the edit that took effect, or `None` for a no-op.
    pub fn mutate_once(
        &self,
        snapshot: &mut NetworkSnapshot,
        rng: &mut dyn RngCore,
    ) -> Result<Option<(MutationKind, usize)>> {
        let kind = MutationKind::ALL[self.categories.sample(rng)];

        if snapshot.layer_count < 3 {
            // Only an insertion between input and output is possible
            if kind == MutationKind::AddLayer {
                self.insert_layer(snapshot, 1, rng);
                return Ok(Some((kind, 1)));
            }
            log::trace!("{:?} skipped: network has no interior layer", kind);
            return Ok(None);
        }

        let layer = rng.gen_range(1..snapshot.layer_count - 1);
        let applied = self.apply(kind, snapshot, layer, rng)?;
        Ok(applied.then_some((kind, layer)))
    }

    /// Apply `kind` to interior layer `layer`. Returns `false` for a no-op.
    pub fn apply(
        &self,
        kind: MutationKind,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<bool> {
        match kind {
            MutationKind::AdjustWeight => self.adjust_weight(snapshot, layer, rng).map(|_| true),
            MutationKind::AddNeuron => self.add_neuron(snapshot, layer, rng).map(|_| true),
            MutationKind::RemoveNeuron => self.remove_neuron(snapshot, layer, rng),
            MutationKind::AddLayer => self.add_layer(snapshot, layer, rng).map(|_| true),
            MutationKind::RemoveLayer => self.remove_layer(snapshot, layer, rng).map(|_| true),
        }
    }

    /// Perturb one weight of a random neuron in `layer`.
    pub fn adjust_weight(
        &self,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        check_interior(snapshot, layer)?;

        let target = &mut snapshot.layer_data[layer];
        let neuron_index = rng.gen_range(0..target.neuron_count);
        let neuron = &mut target.neuron_data[neuron_index];
        let weight_index = rng.gen_range(0..neuron.input_count);

        let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
        let delta = sign * rng.gen::<f64>() * self.adjust_weight_max_percent;

        let weight = &mut neuron.input_weights[weight_index];
        if weight.abs() < ADJUST_EPSILON {
            *weight = delta;
        } else {
            *weight += *weight * delta;
        }

        Ok(())
    }

    /// Append a neuron to `layer` and give every neuron of the next layer one
    /// extra input for it.
    pub fn add_neuron(
        &self,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        check_interior(snapshot, layer)?;

        let input_count = snapshot.neuron_count(layer - 1);
        let weights = gaussian_weights(input_count, rng);
        snapshot.layer_data[layer].push_neuron(NeuronSnapshot::new(gaussian(rng), weights));

        for neuron in &mut snapshot.layer_data[layer + 1].neuron_data {
            neuron.push_weight(gaussian(rng));
        }

        Ok(())
    }

    /// Remove a random neuron from `layer` and the matching input of every
    /// neuron of the next layer. A layer with a single neuron is left alone.
    pub fn remove_neuron(
        &self,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<bool> {
        check_interior(snapshot, layer)?;

        let neuron_count = snapshot.neuron_count(layer);
        if neuron_count <= 1 {
            return Ok(false);
        }

        let index = rng.gen_range(0..neuron_count);
        snapshot.layer_data[layer].remove_neuron(index);

        for neuron in &mut snapshot.layer_data[layer + 1].neuron_data {
            neuron.remove_weight(index);
        }

        Ok(true)
    }

    /// Insert a fresh layer directly before or after `layer`, chosen by a
    /// coin flip. Returns the index of the new layer.
    pub fn add_layer(
        &self,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        check_interior(snapshot, layer)?;

        let position = if rng.gen::<bool>() { layer } else { layer + 1 };
        self.insert_layer(snapshot, position, rng);
        Ok(position)
    }

    /// Insert a random layer so that it lands at `position`, then rebuild
    /// the weights of the layer that now follows it.
    fn insert_layer(&self, snapshot: &mut NetworkSnapshot, position: usize, rng: &mut dyn RngCore) {
        debug_assert!(position >= 1 && position < snapshot.layer_count);

        let size = rng.gen_range(self.new_layer_neurons.clone());
        let input_count = snapshot.neuron_count(position - 1);
        let neurons = (0..size)
            .map(|_| {
                let weights = gaussian_weights(input_count, rng);
                NeuronSnapshot::new(gaussian(rng), weights)
            })
            .collect();
        snapshot.insert_layer(position, LayerSnapshot::new(neurons));

        for neuron in &mut snapshot.layer_data[position + 1].neuron_data {
            neuron.replace_weights(gaussian_weights(size, rng));
        }
    }

    /// Remove `layer` and resize the inputs of the layer after it to the
    /// layer before it, following the configured [`LayerJoinPolicy`].
    pub fn remove_layer(
        &self,
        snapshot: &mut NetworkSnapshot,
        layer: usize,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        check_interior(snapshot, layer)?;

        snapshot.remove_layer(layer);
        let input_count = snapshot.neuron_count(layer - 1);

        for neuron in &mut snapshot.layer_data[layer].neuron_data {
            match self.join_policy {
                LayerJoinPolicy::TruncateOrExtend => {
                    let mut weights = std::mem::take(&mut neuron.input_weights);
                    weights.truncate(input_count);
                    while weights.len() < input_count {
                        weights.push(gaussian(rng));
                    }
                    neuron.replace_weights(weights);
                }
                LayerJoinPolicy::Reinitialize => {
                    neuron.replace_weights(gaussian_weights(input_count, rng));
                }
            }
        }

        Ok(())
    }
}

fn check_interior(snapshot: &NetworkSnapshot, layer: usize) -> Result<()> {
    if layer == 0 || layer + 1 >= snapshot.layer_count {
        return Err(TopogenError::Input(format!(
            "Layer {} is not an interior layer of a {}-layer network",
            layer, snapshot.layer_count
        )));
    }
    Ok(())
}
