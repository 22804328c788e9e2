pub mod aggregate;

pub use aggregate::{Environment, EnvironmentId};
