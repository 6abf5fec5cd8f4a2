use crate::api::{ApiState, create_router};
use crate::config::DicebotConfig;
use crate::metrics::BotMetrics;
use crate::router::{ExpressionEvaluator, MessageRouter};
use dicebot_cache::IdempotencyCache;
use dicebot_error::{DicebotResult, ServerError, ServerErrorKind};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Callback server wiring the cache sweeper, router and HTTP API together.
pub struct BotServer {
    config: DicebotConfig,
    metrics: BotMetrics,
    expressions: Option<Arc<dyn ExpressionEvaluator>>,
}

impl BotServer {
    /// Creates a new bot server.
    pub fn new(config: DicebotConfig) -> Self {
        Self {
            config,
            metrics: BotMetrics::new(),
            expressions: None,
        }
    }

    /// Attaches an evaluator for `=` commands.
    pub fn with_expressions(mut self, expressions: Arc<dyn ExpressionEvaluator>) -> Self {
        self.expressions = Some(expressions);
        self
    }

    /// Metrics collector shared with the running server.
    pub fn metrics(&self) -> &BotMetrics {
        &self.metrics
    }

    /// Binds the configured address and serves until Ctrl+C.
    #[instrument(skip(self), fields(bind = %self.config.server.bind()))]
    pub async fn start(self) -> DicebotResult<()> {
        let bind = self.config.server.bind().clone();
        let listener = TcpListener::bind(&bind)
            .await
            .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", bind, e))))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> DicebotResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cache = IdempotencyCache::new(self.config.cache.clone());
        let sweeper = cache.spawn_sweeper();

        let mut router = MessageRouter::new(cache, &self.config, self.metrics.clone());
        if let Some(expressions) = self.expressions {
            router = router.with_expressions(expressions);
        }
        let app = create_router(ApiState::new(router));

        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::new(ServerErrorKind::Io(e.to_string())))?;
        info!(%addr, "Server started");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        sweeper.abort();
        info!("Server stopped");

        result.map_err(|e| ServerError::new(ServerErrorKind::Io(e.to_string())))?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
