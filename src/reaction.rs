use crate::error::{Result, SsaError};
use crate::species::{Species, SpeciesId};

/// How a reaction names one of its participants.
///
/// Direct handles are checked against the species arena when the engine is
/// built. Labels are resolved immediately against a master species list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParticipantRef {
    Id(SpeciesId),
    Label(String),
}

impl From<SpeciesId> for ParticipantRef {
    fn from(id: SpeciesId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ParticipantRef {
    fn from(label: &str) -> Self {
        Self::Label(label.to_owned())
    }
}

impl From<String> for ParticipantRef {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

/// Unvalidated description of a reaction.
#[derive(Clone, Debug)]
pub struct ReactionSpec {
    pub participants: Vec<ParticipantRef>,
    /// Count change per participant when the reaction fires.
    pub stoichiometry: Vec<i64>,
    /// Participant indices the propensity depends on, with multiplicity.
    /// Derived from the consumed participants when `None`.
    pub sensitivity: Option<Vec<usize>>,
    pub rate_constant: f64,
    pub volume: f64,
}

impl ReactionSpec {
    pub fn new<P>(participants: P, stoichiometry: Vec<i64>, rate_constant: f64, volume: f64) -> Self
    where
        P: IntoIterator,
        P::Item: Into<ParticipantRef>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
            stoichiometry,
            sensitivity: None,
            rate_constant,
            volume,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: Vec<usize>) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }
}

/// A validated mass-action reaction over species held in the engine's arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    participants: Vec<SpeciesId>,
    stoichiometry: Vec<i64>,
    sensitivity: Vec<usize>,
    rate_constant: f64,
    volume: f64,
}

impl Reaction {
    /// Validates `spec`. `all_species` is required as soon as any participant
    /// is given by label.
    pub fn new(spec: ReactionSpec, all_species: Option<&[Species]>) -> Result<Self> {
        let ReactionSpec {
            participants,
            stoichiometry,
            sensitivity,
            rate_constant,
            volume,
        } = spec;

        if stoichiometry.len() != participants.len() {
            return Err(SsaError::configuration(format!(
                "stoichiometry length {} does not match participant count {}",
                stoichiometry.len(),
                participants.len()
            )));
        }
        check_rate_constant(rate_constant)?;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(SsaError::configuration(format!(
                "volume must be positive and finite, got {}",
                volume
            )));
        }

        let participants = participants
            .into_iter()
            .map(|participant| resolve_participant(participant, all_species))
            .collect::<Result<Vec<_>>>()?;

        let sensitivity = match sensitivity {
            Some(list) => {
                if let Some(&bad) = list.iter().find(|&&idx| idx >= participants.len()) {
                    return Err(SsaError::configuration(format!(
                        "sensitivity index {} exceeds participant count {}",
                        bad,
                        participants.len()
                    )));
                }
                list
            }
            None => default_sensitivity(&stoichiometry),
        };

        Ok(Self {
            participants,
            stoichiometry,
            sensitivity,
            rate_constant,
            volume,
        })
    }

    /// `rate_constant * prod(count / volume)` over the sensitivity multiset.
    ///
    /// # Panics
    ///
    /// If a participant index is out of bounds for `species`. The engine
    /// checks this once in [`Engine::new`](crate::Engine::new).
    #[inline]
    pub fn propensity(&self, species: &[Species]) -> f64 {
        let mut propensity = self.rate_constant;
        for &idx in &self.sensitivity {
            let count = species[self.participants[idx].index()].count();
            if count == 0 {
                return 0.0;
            }
            propensity *= count as f64 / self.volume;
        }
        propensity
    }

    /// Applies the stoichiometric update to every participant. Panics under
    /// the same condition as [`Reaction::propensity`].
    pub fn fire(&self, species: &mut [Species]) {
        for (id, &delta) in self.participants.iter().zip(&self.stoichiometry) {
            species[id.index()].apply_delta(delta);
        }
    }

    /// Meant for parameter changes between runs, not mid-run.
    pub fn set_rate_constant(&mut self, rate_constant: f64) -> Result<()> {
        check_rate_constant(rate_constant)?;
        self.rate_constant = rate_constant;
        Ok(())
    }

    pub fn rate_constant(&self) -> f64 {
        self.rate_constant
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn participants(&self) -> &[SpeciesId] {
        &self.participants
    }

    pub fn stoichiometry(&self) -> &[i64] {
        &self.stoichiometry
    }

    pub fn sensitivity(&self) -> &[usize] {
        &self.sensitivity
    }
}

fn check_rate_constant(rate_constant: f64) -> Result<()> {
    if !rate_constant.is_finite() || rate_constant < 0.0 {
        return Err(SsaError::configuration(format!(
            "rate constant must be non-negative and finite, got {}",
            rate_constant
        )));
    }
    Ok(())
}

fn resolve_participant(
    participant: ParticipantRef,
    all_species: Option<&[Species]>,
) -> Result<SpeciesId> {
    match participant {
        ParticipantRef::Id(id) => Ok(id),
        ParticipantRef::Label(label) => {
            let all_species = all_species.ok_or_else(|| {
                SsaError::configuration(format!(
                    "participant '{}' is given by label but no species list was supplied",
                    label
                ))
            })?;
            all_species
                .iter()
                .position(|species| species.label() == label)
                .map(SpeciesId)
                .ok_or(SsaError::ReactantNotFound { label })
        }
    }
}

/// Mass-action default: each consumed participant appears once per unit consumed.
pub(crate) fn default_sensitivity(stoichiometry: &[i64]) -> Vec<usize> {
    stoichiometry
        .iter()
        .enumerate()
        .filter(|&(_, &delta)| delta < 0)
        .flat_map(|(idx, &delta)| std::iter::repeat_n(idx, delta.unsigned_abs() as usize))
        .collect()
}
