pub mod app;
pub mod selector_panel;
pub mod state;
pub mod theme;
pub mod tick_table;

pub use app::*;
pub use selector_panel::*;
pub use state::*;
pub use theme::*;
pub use tick_table::*;
