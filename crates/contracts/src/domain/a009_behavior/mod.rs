pub mod aggregate;

pub use aggregate::{Behavior, BehaviorId};
