pub mod config;
pub mod model;
pub mod repository;
pub mod transport;
pub mod types;

use std::sync::Arc;

pub use config::Config;
pub use model::Model;
pub use repository::Repository;

use crate::error::ApiError;
use transport::HttpTransport;

/// Everything the reducers reach out to
#[derive(Clone)]
pub struct Environment {
    pub model: Model,
    pub repository: Repository,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    pub fn new(model: Model, repository: Repository) -> Self {
        Self { model, repository }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let directory = config.storage_directory().map_err(ApiError::Storage)?;
        let repository = Repository::new(&directory);
        let transport = HttpTransport::new(&config.base_url, config.timeout())?;
        let model = Model::new(Arc::new(transport), repository.clone());
        Ok(Self::new(model, repository))
    }
}
