/// Handle to a species inside the engine's species arena.
///
/// The index follows the canonical ordering of the species list handed to
/// [`Engine::new`](crate::Engine::new).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeciesId(pub usize);

impl SpeciesId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for SpeciesId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// A named molecule count with a remembered starting value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Species {
    count: i64,
    initial_count: i64,
    label: String,
}

impl Species {
    pub fn new(count: i64, label: impl Into<String>) -> Self {
        Self {
            count,
            initial_count: count,
            label: label.into(),
        }
    }

    #[inline]
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn initial_count(&self) -> i64 {
        self.initial_count
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn reset(&mut self) {
        self.count = self.initial_count;
    }

    pub fn set(&mut self, count: i64) {
        self.count = count;
    }

    /// Adds a signed delta. Going below zero is not checked.
    #[inline]
    pub fn apply_delta(&mut self, delta: i64) {
        self.count += delta;
    }
}
