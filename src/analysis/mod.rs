pub mod aggregate;
pub mod axis;
pub mod buckets;
pub mod extent;
pub mod user_ticks;

pub use aggregate::*;
pub use axis::*;
pub use buckets::*;
pub use extent::*;
pub use user_ticks::*;
