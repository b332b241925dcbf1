//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::build_router;
use crate::config::AppConfig;
use crate::core::service::DataService;
use crate::entities::{Habit, Tag, register_all};
use crate::registry::ShapingRegistry;
use crate::storage::InMemoryDataService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the habit API server
///
/// Services default to empty in-memory stores and the registry defaults
/// to every built-in entity with the configured sort overrides applied.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::from_yaml_file("habits.yaml")?)
///     .with_habit_service(InMemoryDataService::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    habits: Option<Arc<dyn DataService<Habit>>>,
    tags: Option<Arc<dyn DataService<Tag>>>,
    registry: Option<Arc<ShapingRegistry>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            habits: None,
            tags: None,
            registry: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the habit store
    pub fn with_habit_service(mut self, service: impl DataService<Habit> + 'static) -> Self {
        self.habits = Some(Arc::new(service));
        self
    }

    /// Set the tag store
    pub fn with_tag_service(mut self, service: impl DataService<Tag> + 'static) -> Self {
        self.tags = Some(Arc::new(service));
        self
    }

    /// Use a prebuilt registry instead of the default one
    ///
    /// Sort overrides from the configuration are not applied to it.
    pub fn with_registry(mut self, registry: ShapingRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Assemble the shared handler state
    pub fn build_state(self) -> Result<AppState> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(
                register_all(ShapingRegistry::builder())
                    .with_sort_overrides(&self.config.sorting)
                    .build()?,
            ),
        };

        Ok(AppState {
            habits: self
                .habits
                .unwrap_or_else(|| Arc::new(InMemoryDataService::<Habit>::new())),
            tags: self
                .tags
                .unwrap_or_else(|| Arc::new(InMemoryDataService::<Tag>::new())),
            registry,
            pagination: self.config.pagination,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let server = self.config.server.clone();
        let state = self.build_state()?;
        Ok(build_router(state, &server))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on the address from the configuration
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.server.address();
        self.serve(&addr).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for Ctrl+C or SIGTERM
///
/// A signal that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
