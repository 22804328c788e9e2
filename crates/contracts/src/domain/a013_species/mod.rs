pub mod aggregate;

pub use aggregate::{Species, SpeciesId};
