pub mod aggregate;

pub use aggregate::{Town, TownId};
