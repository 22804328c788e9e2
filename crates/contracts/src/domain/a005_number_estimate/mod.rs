pub mod aggregate;

pub use aggregate::{NumberEstimate, NumberEstimateId};
