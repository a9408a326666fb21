use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::Config;
use crate::data::{
    self, seed::seed_ingredients, RepositoryError, SqliteIngredientRepository,
    SqliteOrderRepository,
};
use crate::web::{create_router, AppState, IngredientById};

const MAX_DB_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog load failed: {0}")]
    Catalog(#[from] RepositoryError),
}

/// The running application minus the HTTP listener.
///
/// # Example
///
/// ```ignore
/// let app = TacoCloud::start(&config).await?;
/// axum::serve(listener, app.router()).await?;
/// app.shutdown().await?;
/// ```
pub struct TacoCloud {
    /// State handed to every request handler.
    pub state: AppState,
    pool: SqlitePool,
    session_handle: JoinHandle<()>,
}

impl TacoCloud {
    /// Connects to `config.database_url` and starts the system.
    pub async fn start(config: &Config) -> Result<Self, StartupError> {
        let pool = data::connect(&config.database_url, MAX_DB_CONNECTIONS).await?;
        data::init_schema(&pool).await?;
        Self::with_pool(pool, config.session_buffer, config.session_ttl()).await
    }

    /// Starts the system on an existing pool whose schema is already in place.
    pub async fn with_pool(
        pool: SqlitePool,
        session_buffer: usize,
        session_ttl: Option<Duration>,
    ) -> Result<Self, StartupError> {
        let ingredients = Arc::new(SqliteIngredientRepository::new(pool.clone()));
        seed_ingredients(ingredients.as_ref()).await?;
        let resolver = IngredientById::load(ingredients.as_ref()).await?;

        let (session_actor, sessions) = crate::session::new(session_buffer, session_ttl);
        let session_handle = tokio::spawn(session_actor.run(()));

        let state = AppState {
            ingredients,
            orders: Arc::new(SqliteOrderRepository::new(pool.clone())),
            resolver,
            sessions,
        };

        info!("Taco Cloud started");
        Ok(Self {
            state,
            pool,
            session_handle,
        })
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Stops the session actor and closes the pool.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.state);
        if let Err(e) = self.session_handle.await {
            error!("Session actor failed: {:?}", e);
            return Err(format!("Session actor failed: {:?}", e));
        }

        self.pool.close().await;
        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ActorClient;

    #[tokio::test]
    async fn test_start_seeds_catalog_and_serves_sessions() {
        let pool = data::connect_in_memory().await.unwrap();
        let app = TacoCloud::with_pool(pool, 4, None).await.unwrap();

        assert_eq!(app.state.ingredients.find_all().await.unwrap().len(), 10);
        assert!(app.state.resolver.resolve("CARN").is_some());

        let session = app.state.sessions.open().await.unwrap();
        assert!(app.state.sessions.get(session.id).await.unwrap().is_some());

        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_after_router_dropped() {
        let pool = data::connect_in_memory().await.unwrap();
        let app = TacoCloud::with_pool(pool, 4, None).await.unwrap();
        let router = app.router();
        drop(router);

        app.shutdown().await.unwrap();
    }
}
