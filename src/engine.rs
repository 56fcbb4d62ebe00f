use rand::distr::Open01;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SsaError};
use crate::reaction::Reaction;
use crate::species::Species;
use crate::trajectory::Trajectory;

/// Engine settings that are not part of the reaction network itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed seed for reproducible runs. Seeded from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Gillespie direct-method engine.
///
/// Owns the species arena, the reactions that index into it, the simulated
/// time and the recorded trajectory.
pub struct Engine {
    species: Vec<Species>,
    reactions: Vec<Reaction>,
    t: f64,
    history: Trajectory,
    propensities: Vec<f64>,
    rng: ChaCha8Rng,
}

impl Engine {
    pub fn new(species: Vec<Species>, reactions: Vec<Reaction>, config: EngineConfig) -> Result<Self> {
        for (idx, reaction) in reactions.iter().enumerate() {
            if let Some(bad) = reaction
                .participants()
                .iter()
                .find(|id| id.index() >= species.len())
            {
                return Err(SsaError::configuration(format!(
                    "reaction {} references species index {} but only {} species exist",
                    idx,
                    bad.index(),
                    species.len()
                )));
            }
        }

        let mut engine = Self {
            history: Trajectory::new(species.len()),
            propensities: vec![0.0; reactions.len()],
            rng: make_rng(config.seed),
            species,
            reactions,
            t: 0.0,
        };
        engine.record();
        Ok(engine)
    }

    /// Restores initial counts, rewinds time to zero and clears the history
    /// down to the initial snapshot.
    pub fn reset(&mut self) {
        for species in &mut self.species {
            species.reset();
        }
        self.t = 0.0;
        self.history.clear();
        self.record();
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Performs one SSA step. Returns `false`, leaving state and time
    /// untouched, when the total propensity is zero.
    pub fn iterate(&mut self) -> bool {
        let total = self.recompute_propensities();
        if !(total > 0.0) {
            debug!(t = self.t, "total propensity is zero, no reaction can fire");
            return false;
        }

        // Draw order is fixed: waiting time first, then selection.
        let u1: f64 = self.rng.sample(Open01);
        let u2: f64 = self.rng.sample(Open01);
        let tau = (1.0 / total) * (1.0 / u1).ln();
        let chosen = select_reaction(&self.propensities, total, u2);

        self.reactions[chosen].fire(&mut self.species);
        self.t += tau;
        trace!(reaction = chosen, tau, t = self.t, "reaction fired");
        self.record();
        true
    }

    /// Runs until exhaustion or `max_iterations` steps, whichever comes
    /// first. Returns the number of steps executed.
    pub fn simulate(&mut self, max_iterations: usize, reset: bool) -> usize {
        if reset {
            self.reset();
        }
        let mut executed = 0usize;
        while executed < max_iterations && self.iterate() {
            executed += 1;
        }
        debug!(executed, t = self.t, "simulation finished");
        executed
    }

    /// Runs up to exactly `end_time`.
    ///
    /// The event that carries time past `end_time` is undone, so the final
    /// state only reflects events at or before the horizon. The trajectory
    /// always closes with an entry at `end_time`.
    pub fn simulate_to_time(&mut self, end_time: f64, reset: bool) -> Result<f64> {
        let start = if reset { 0.0 } else { self.t };
        if !end_time.is_finite() || end_time < start {
            return Err(SsaError::InvalidEndTime {
                end_time,
                current: start,
            });
        }
        if reset {
            self.reset();
        }

        let mut executed = 0usize;
        while self.t <= end_time && self.iterate() {
            executed += 1;
        }
        let overshot = self.t > end_time;

        let restored = self.history.clamp_to(end_time).ok_or_else(|| {
            SsaError::configuration("trajectory has no initial snapshot to rewind to")
        })?;
        if overshot {
            debug!(overshoot_t = self.t, end_time, "rewinding final event");
            for (species, &count) in self.species.iter_mut().zip(restored) {
                species.set(count);
            }
        }
        self.t = end_time;
        debug!(executed, end_time, "simulation to time finished");
        Ok(self.t)
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn species_by_label(&self, label: &str) -> Option<&Species> {
        self.species.iter().find(|species| species.label() == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.species.iter().map(Species::label).collect()
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Updates one reaction's rate constant between runs.
    pub fn set_rate_constant(&mut self, reaction: usize, rate_constant: f64) -> Result<()> {
        self.reactions
            .get_mut(reaction)
            .ok_or(SsaError::UnknownReaction(reaction))?
            .set_rate_constant(rate_constant)
    }

    pub fn propensities(&self) -> Vec<f64> {
        self.reactions
            .iter()
            .map(|reaction| reaction.propensity(&self.species))
            .collect()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.history
    }

    fn recompute_propensities(&mut self) -> f64 {
        let mut total = 0.0;
        for (slot, reaction) in self.propensities.iter_mut().zip(&self.reactions) {
            let value = reaction.propensity(&self.species);
            *slot = value;
            total += value;
        }
        total
    }

    fn record(&mut self) {
        let counts = self.species.iter().map(Species::count).collect();
        self.history.record(counts, self.t);
    }
}

/// Picks the smallest index whose cumulative propensity share reaches `u`.
///
/// Rounding can leave the final cumulative share just under one; the last
/// reaction with a non-zero propensity is chosen in that case.
pub(crate) fn select_reaction(propensities: &[f64], total: f64, u: f64) -> usize {
    let mut cumulative = 0.0;
    for (idx, &value) in propensities.iter().enumerate() {
        cumulative += value;
        if value > 0.0 && cumulative / total >= u {
            return idx;
        }
    }
    propensities
        .iter()
        .rposition(|&value| value > 0.0)
        .unwrap_or(propensities.len().saturating_sub(1))
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}
