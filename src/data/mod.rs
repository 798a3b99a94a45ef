pub mod fees;
pub mod normalize;
pub mod source;
pub mod tick;

pub use fees::*;
pub use normalize::*;
pub use source::*;
pub use tick::*;
