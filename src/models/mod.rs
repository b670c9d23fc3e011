pub mod coerce;
pub mod fruit;

pub use fruit::*;
