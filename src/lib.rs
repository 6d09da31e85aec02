pub mod agents;
pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod models;
pub mod render;
pub mod session;
pub mod simulator;
pub mod utils;
