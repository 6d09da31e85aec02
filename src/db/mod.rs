pub mod connection;
pub mod exports;
pub mod history;
pub mod schema;
pub mod settings;

pub use connection::{Database, HistoryLimits};
