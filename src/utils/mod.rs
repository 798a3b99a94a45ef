pub mod formatting;
pub mod math;

pub use formatting::*;
pub use math::*;
