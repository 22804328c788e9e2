pub mod aggregate;

pub use aggregate::{SpeciesClass, SpeciesClassId};
