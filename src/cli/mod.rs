pub mod commands;
pub mod run;
pub mod serve;
pub mod status;
pub mod results;
pub mod export;
pub mod history;

pub use commands::{Cli, Commands};

use std::sync::Arc;
use crate::client::{HttpJobClient, JobClient};
use crate::config::Settings;
use crate::errors::RepurposeError;

pub(crate) fn backend_client(settings: &Settings) -> Result<Arc<dyn JobClient>, RepurposeError> {
    Ok(Arc::new(HttpJobClient::new(
        &settings.api_url,
        settings.timeout,
        settings.auth_token.clone(),
    )?))
}
