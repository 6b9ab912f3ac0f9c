pub mod category;
pub mod logger;
pub mod settings;
pub mod types;


pub use category::normalize_category;
pub use settings::load_settings;
pub use types::{percent_of, round_half_up};
