pub mod aggregate;

pub use aggregate::{Sex, SexId};
