pub mod aggregate;

pub use aggregate::{Locality, LocalityId};
