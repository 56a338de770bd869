use std::sync::Arc;

use tracing::info;

use crate::backend::database::DatabaseBackendConfig;
use crate::backend::{AppBackend, Backend, BackendFactory};
use crate::config::AppConfig;
use crate::error::AppResult;

/// Connect the configured backend and create every tenant's tables on it.
pub async fn setup_backend(config: &AppConfig) -> AppResult<Arc<dyn AppBackend>> {
    let backend_config = DatabaseBackendConfig::from_app_config(config)?;

    info!(
        database_type = ?backend_config.database_type,
        max_connections = backend_config.max_connections,
        "connecting backend"
    );
    let backend = BackendFactory::create(&backend_config).await?;

    for tenant in &config.tenants {
        backend.init_tenant(tenant.id).await?;
        info!(tenant_id = tenant.id, base_path = %tenant.base_path(), "tenant initialized");
    }

    Ok(backend)
}
