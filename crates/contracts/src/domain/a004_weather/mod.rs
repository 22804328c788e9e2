pub mod aggregate;

pub use aggregate::{Weather, WeatherId};
