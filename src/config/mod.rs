pub mod app_settings;
pub mod settings;

pub use app_settings::*;
pub use settings::*;
