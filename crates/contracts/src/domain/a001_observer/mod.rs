pub mod aggregate;

pub use aggregate::{Observer, ObserverId};
