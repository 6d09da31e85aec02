pub mod http;
pub mod provider;

pub use http::HttpJobClient;
pub use provider::JobClient;
