pub mod drag;
pub mod host;
pub mod mapper;
pub mod range_drag;

pub use drag::*;
pub use host::SelectorHost;
pub use mapper::*;
pub use range_drag::*;
