pub mod aggregate;

pub use aggregate::{Age, AgeId};
