//! Gillespie direct-method simulation of well-mixed reaction networks.

mod engine;
mod error;
mod reaction;
mod species;
mod trajectory;

pub use engine::{Engine, EngineConfig};
pub use error::{Result, SsaError};
pub use reaction::{ParticipantRef, Reaction, ReactionSpec};
pub use species::{Species, SpeciesId};
pub use trajectory::{Snapshot, Trajectory};
