//! Module assembly: wires storage, access control, service and transports

use crate::api::{native::NativeClient, rest};
use crate::config::{Config, ConfigError};
use crate::contract::FormsApi;
use crate::domain::{AccessControl, AllowAll, EntryStore, FormRepository, Service};
use crate::infra::storage::{InMemoryEntryStore, InMemoryFormRepository};
use axum::Router;
use std::path::Path;
use std::sync::Arc;

/// Forms service module
pub struct FormsServiceModule {
    service: Arc<Service>,
    client: Arc<dyn FormsApi>,
}

impl FormsServiceModule {
    /// Build the module over the given collaborators
    pub fn new(
        config: Config,
        forms: Arc<dyn FormRepository>,
        entries: Arc<dyn EntryStore>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        let service = Arc::new(Service::new(forms, entries, config));
        let client: Arc<dyn FormsApi> = Arc::new(NativeClient::new(service.clone(), access));

        tracing::info!(
            page_limit = service.config().default_page_limit,
            collation = %service.config().collation,
            "forms service initialized"
        );

        Self { service, client }
    }

    /// In-memory storage with every read allowed
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryFormRepository::new()),
            Arc::new(InMemoryEntryStore::new()),
            Arc::new(AllowAll),
        )
    }

    /// In-memory module configured from an optional YAML file and the environment
    pub fn from_config_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::in_memory(Config::load(path)?))
    }

    pub fn config(&self) -> &Config {
        self.service.config()
    }

    /// Native client for in-process calls
    pub fn client(&self) -> Arc<dyn FormsApi> {
        self.client.clone()
    }

    /// REST router exposing the client over HTTP
    pub fn router(&self) -> Router {
        rest::register_routes(Router::new(), self.client())
    }
}
