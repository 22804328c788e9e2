pub mod aggregate;

pub use aggregate::{DistanceEstimate, DistanceEstimateId};
