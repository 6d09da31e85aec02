pub mod parser;
pub mod schema;
pub mod types;

pub use types::*;
pub use parser::{load_settings, parse_config};
