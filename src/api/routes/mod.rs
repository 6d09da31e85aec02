pub mod context;
pub mod health;
pub mod history;
pub mod preferences;
pub mod results;
pub mod sessions;
