use serde::Serialize;

/// Species counts, in canonical order, at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub counts: Vec<i64>,
    pub t: f64,
}

/// Time-ordered record of every state the engine passed through.
///
/// Times are non-decreasing. The first entry is the state at `t = 0` (or at
/// the last reset).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Trajectory {
    n_species: usize,
    entries: Vec<Snapshot>,
}

impl Trajectory {
    pub(crate) fn new(n_species: usize) -> Self {
        Self {
            n_species,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, counts: Vec<i64>, t: f64) {
        debug_assert_eq!(counts.len(), self.n_species);
        debug_assert!(self.entries.last().is_none_or(|last| last.t <= t));
        self.entries.push(Snapshot { counts, t });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Discards entries recorded after `end_time` and closes the trajectory
    /// with an entry at exactly `end_time`.
    ///
    /// Returns the counts the live state must be restored to, which are the
    /// counts of the last entry at or before `end_time`. The closing entry is
    /// skipped when the last kept entry already sits at `end_time`.
    pub(crate) fn clamp_to(&mut self, end_time: f64) -> Option<&[i64]> {
        while self.entries.len() > 1 && self.entries.last().is_some_and(|e| e.t > end_time) {
            self.entries.pop();
        }
        let last = self.entries.last()?;
        if last.t != end_time {
            let counts = last.counts.clone();
            self.entries.push(Snapshot {
                counts,
                t: end_time,
            });
        }
        self.entries.last().map(|e| e.counts.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn n_species(&self) -> usize {
        self.n_species
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn time_vector(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.t).collect()
    }

    /// One row per species in canonical order, one column per entry.
    pub fn state_matrix(&self) -> Vec<Vec<i64>> {
        (0..self.n_species)
            .map(|species| self.entries.iter().map(|e| e.counts[species]).collect())
            .collect()
    }

    /// Trajectory of a single species, `None` if the index is out of range.
    pub fn state_vector(&self, species: usize) -> Option<Vec<i64>> {
        (species < self.n_species).then(|| self.entries.iter().map(|e| e.counts[species]).collect())
    }
}
